//! Progress information and worker messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline phase being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Spatial,
    Temporal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Spatial => "spatial",
            Phase::Temporal => "temporal",
        }
    }
}

/// Progress information reported by the worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    /// Phase the counters refer to.
    pub phase: Phase,

    /// Frames finished within the phase.
    pub frame: usize,

    /// Total frames the phase will touch.
    pub total_frames: usize,

    /// Current processing speed in frames per second.
    pub fps: f64,

    /// Estimated time remaining in seconds.
    pub eta: f64,
}

impl ProgressInfo {
    pub fn new(phase: Phase, frame: usize, total_frames: usize, fps: f64, eta: f64) -> Self {
        Self {
            phase,
            frame,
            total_frames,
            fps,
            eta,
        }
    }

    /// Progress as a fraction (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.frame as f64 / self.total_frames as f64
    }

    /// Progress as a percentage (0 to 100).
    pub fn percent_complete(&self) -> i32 {
        (self.progress() * 100.0) as i32
    }

    /// Formatted ETA string (e.g., "1h 23m 45s").
    pub fn eta_formatted(&self) -> String {
        if self.eta <= 0.0 || !self.eta.is_finite() {
            return "--".to_string();
        }

        let total_secs = self.eta as i64;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {:02}m {:02}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {:02}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Messages sent from the worker to the controlling app via stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage {
    /// Progress update.
    Progress {
        phase: Phase,
        frame: usize,
        #[serde(rename = "totalFrames")]
        total_frames: usize,
        fps: f64,
        eta: f64,
    },

    /// Log message.
    Log {
        level: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Error message.
    Error { message: String },

    /// Job completion.
    Complete {
        success: bool,
        #[serde(rename = "outputPath", skip_serializing_if = "Option::is_none")]
        output_path: Option<String>,
    },
}

impl WorkerMessage {
    /// Create a progress message.
    pub fn progress(info: &ProgressInfo) -> Self {
        WorkerMessage::Progress {
            phase: info.phase,
            frame: info.frame,
            total_frames: info.total_frames,
            fps: info.fps,
            eta: info.eta,
        }
    }

    /// Create a log message stamped with the current time.
    pub fn log(level: LogLevel, message: &str) -> Self {
        WorkerMessage::Log {
            level: level.as_str().to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Create an error message.
    pub fn error(message: &str) -> Self {
        WorkerMessage::Error {
            message: message.to_string(),
        }
    }

    /// Create a completion message.
    pub fn complete(success: bool, output_path: Option<&str>) -> Self {
        WorkerMessage::Complete {
            success,
            output_path: output_path.map(String::from),
        }
    }
}

/// Log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}
