//! Progress reporting via JSON on stdout.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::models::{LogLevel, ProgressInfo, WorkerMessage};

/// Thread-safe progress reporter that outputs JSON messages to stdout.
///
/// Clones share one output lock, so workers on the rayon pool can report
/// concurrently without interleaving lines.
#[derive(Clone)]
pub struct ProgressReporter {
    output_lock: Arc<Mutex<()>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            output_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Send a progress update.
    pub fn send_progress(&self, progress: &ProgressInfo) {
        self.send_message(&WorkerMessage::progress(progress));
    }

    /// Send a timestamped log message.
    pub fn send_log(&self, level: LogLevel, message: &str) {
        self.send_message(&WorkerMessage::log(level, message));
    }

    /// Send an error message.
    pub fn send_error(&self, message: &str) {
        self.send_message(&WorkerMessage::error(message));
    }

    /// Send a completion message.
    pub fn send_complete(&self, success: bool, output_path: Option<&str>) {
        self.send_message(&WorkerMessage::complete(success, output_path));
    }

    fn send_message(&self, message: &WorkerMessage) {
        let _lock = self.output_lock.lock().unwrap();

        match serde_json::to_string(message) {
            Ok(json) => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                if let Err(e) = writeln!(handle, "{}", json) {
                    eprintln!("Failed to write to stdout: {}", e);
                }
                let _ = handle.flush();
            }
            Err(e) => {
                eprintln!("Failed to serialize message: {}", e);
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
