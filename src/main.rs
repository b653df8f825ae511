//! Lumaclean Worker - grayscale video denoising tool
//!
//! This worker process receives a job configuration file via --config
//! argument, decodes the input through ffmpeg into grayscale frames, runs
//! the spatial and temporal denoising passes, and encodes the result.
//! Progress is reported via JSON messages on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod codec;
mod error;
mod frame;
mod models;
mod pipeline;
mod progress_reporter;
mod spatial;
mod stats;
mod temporal;

use codec::FrameCodec;
use error::DenoiseError;
use models::{DenoiseJob, LogLevel};
use pipeline::DenoisePipeline;
use progress_reporter::ProgressReporter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "lumaclean-worker")]
#[command(about = "Adaptive spatio-temporal denoiser for grayscale video")]
#[command(version)]
struct Args {
    /// Path to the job configuration JSON file
    #[arg(long)]
    config: PathBuf,

    /// Also write the decoded (untouched) input next to the output,
    /// for side-by-side comparison
    #[arg(long)]
    keep_original: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let reporter = ProgressReporter::new();

    // Set up cancellation flag
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    // Handle SIGTERM/SIGINT for graceful cancellation
    if let Err(e) = ctrlc::set_handler(move || {
        cancelled_clone.store(true, Ordering::SeqCst);
    }) {
        reporter.send_error(&format!("Failed to set signal handler: {}", e));
        return ExitCode::from(1);
    }

    match run_worker(&args, &reporter, cancelled) {
        Ok(output_path) => {
            reporter.send_complete(true, Some(&output_path));
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.downcast_ref::<DenoiseError>() == Some(&DenoiseError::Cancelled) {
                reporter.send_log(LogLevel::Info, "Job cancelled by user");
                reporter.send_complete(false, None);
                ExitCode::from(130) // Standard exit code for SIGINT
            } else {
                reporter.send_error(&format!("{:#}", e));
                reporter.send_complete(false, None);
                ExitCode::from(1)
            }
        }
    }
}

fn run_worker(
    args: &Args,
    reporter: &ProgressReporter,
    cancelled: Arc<AtomicBool>,
) -> Result<String> {
    // Load job configuration
    reporter.send_log(LogLevel::Info, "Loading job configuration...");
    let config_content = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config file: {:?}", args.config))?;
    let job: DenoiseJob = serde_json::from_str(&config_content)
        .with_context(|| "Failed to parse job configuration")?;

    reporter.send_log(LogLevel::Info, &format!("Processing: {}", job.input_path));
    reporter.send_log(
        LogLevel::Debug,
        &format!(
            "Spatial: radius={}, edge={}; temporal: window={}, edge={}",
            job.spatial.radius,
            job.spatial.edge_threshold,
            job.temporal.previous_frames,
            job.temporal.edge_threshold
        ),
    );

    // Decode input to grayscale frames
    let codec = FrameCodec::locate()?;
    reporter.send_log(LogLevel::Info, "Decoding input...");
    let mut frames = codec
        .decode(Path::new(&job.input_path))
        .with_context(|| format!("Failed to decode {}", job.input_path))?;

    if let Some(range) = job.frame_range {
        let (start, end) = range.clamp_to(frames.len());
        frames = frames.drain(start..end).collect();
    }

    reporter.send_log(
        LogLevel::Info,
        &format!(
            "{} frames at {}x{}",
            frames.len(),
            frames.first().map_or(0, |f| f.cols()),
            frames.first().map_or(0, |f| f.rows())
        ),
    );

    if args.keep_original {
        let original_path = sibling_path(&job.output_path, "original");
        codec
            .encode(&frames, Path::new(&original_path), job.frame_rate)
            .with_context(|| format!("Failed to encode {}", original_path))?;
        reporter.send_log(LogLevel::Debug, &format!("Original written to {}", original_path));
    }

    // Run the two-phase pipeline
    reporter.send_log(LogLevel::Info, "Denoising...");
    let pipeline = DenoisePipeline::new(
        job.spatial.clone(),
        job.temporal.clone(),
        reporter.clone(),
        cancelled.clone(),
    );
    let frames = pipeline.run(frames)?;

    // Encode output
    reporter.send_log(LogLevel::Info, "Encoding output...");
    let result = codec.encode(&frames, Path::new(&job.output_path), job.frame_rate);

    // If cancelled late, remove partial output
    if cancelled.load(Ordering::SeqCst) {
        if let Err(e) = std::fs::remove_file(&job.output_path) {
            reporter.send_log(
                LogLevel::Warning,
                &format!("Failed to remove partial output: {}", e),
            );
        }
        return Err(DenoiseError::Cancelled.into());
    }

    result.with_context(|| format!("Failed to encode {}", job.output_path))?;

    reporter.send_log(LogLevel::Info, "Denoising complete!");
    Ok(job.output_path.clone())
}

/// Build "path.tag.ext" next to an output path.
fn sibling_path(output_path: &str, tag: &str) -> String {
    let path = Path::new(output_path);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("mp4");
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    parent
        .join(format!("{}.{}.{}", stem, tag, ext))
        .to_string_lossy()
        .to_string()
}
