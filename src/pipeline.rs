//! Two-phase denoising orchestrator.
//!
//! The spatial pass is embarrassingly parallel: every frame reads only the
//! untouched input sequence, so frames are spread across the rayon pool with
//! no ordering constraint. The temporal pass walks frames strictly in
//! increasing index order, because frame `t`'s denoised output is part of
//! frame `t+1`'s history; within one frame its lines are independent and run
//! in parallel, joining before the frame is swapped into the sequence.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::DenoiseError;
use crate::frame::{Frame, Sequence};
use crate::models::{LogLevel, Phase, ProgressInfo, SpatialParameters, TemporalParameters};
use crate::progress_reporter::ProgressReporter;
use crate::spatial;
use crate::temporal;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Runs the spatial and temporal passes over a frame sequence.
pub struct DenoisePipeline {
    spatial: SpatialParameters,
    temporal: TemporalParameters,
    reporter: ProgressReporter,
    cancelled: Arc<AtomicBool>,
}

impl DenoisePipeline {
    pub fn new(
        spatial: SpatialParameters,
        temporal: TemporalParameters,
        reporter: ProgressReporter,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            spatial,
            temporal,
            reporter,
            cancelled,
        }
    }

    /// Run both passes, consuming the input sequence.
    pub fn run(&self, frames: Sequence) -> Result<Sequence, DenoiseError> {
        validate_dimensions(&frames)?;
        let frames = self.spatial_phase(&frames)?;
        self.temporal_phase(frames)
    }

    /// Spatial pass: frames distributed across the pool, implicit join at
    /// the end of the collect.
    fn spatial_phase(&self, frames: &[Frame]) -> Result<Sequence, DenoiseError> {
        self.log_phase_start(Phase::Spatial, frames.len());
        let progress = PhaseProgress::new(&self.reporter, Phase::Spatial, frames.len());
        let denoised: Result<Sequence, DenoiseError> = frames
            .par_iter()
            .map(|frame| {
                if self.cancelled.load(Ordering::SeqCst) {
                    return Err(DenoiseError::Cancelled);
                }
                let denoised = spatial::denoise_frame(frame, &self.spatial)?;
                progress.tick();
                Ok(denoised)
            })
            .collect();
        let denoised = denoised?;
        self.log_phase_done(Phase::Spatial);
        Ok(denoised)
    }

    /// Temporal pass: strict frame order, lines parallel within a frame.
    fn temporal_phase(&self, mut frames: Sequence) -> Result<Sequence, DenoiseError> {
        self.log_phase_start(Phase::Temporal, frames.len());
        let progress = PhaseProgress::new(&self.reporter, Phase::Temporal, frames.len());

        for t in 0..frames.len() {
            if self.cancelled.load(Ordering::SeqCst) {
                return Err(DenoiseError::Cancelled);
            }

            if t <= temporal::MIN_HISTORY_FRAME || t < self.temporal.previous_frames {
                progress.tick();
                continue;
            }

            let rows: Result<Vec<Vec<u8>>, DenoiseError> = (0..frames[t].rows())
                .into_par_iter()
                .map(|line| {
                    if self.cancelled.load(Ordering::SeqCst) {
                        return Err(DenoiseError::Cancelled);
                    }
                    temporal::denoise_line(&frames, t, line, &self.temporal)
                })
                .collect();

            // All lines have joined; only now does the frame become history
            // for its successors.
            frames[t] = Frame::from_rows(rows?)?;
            progress.tick();
        }

        self.log_phase_done(Phase::Temporal);
        Ok(frames)
    }

    fn log_phase_start(&self, phase: Phase, total: usize) {
        self.reporter.send_log(
            LogLevel::Info,
            &format!("Starting {} pass ({} frames)", phase.as_str(), total),
        );
    }

    fn log_phase_done(&self, phase: Phase) {
        self.reporter
            .send_log(LogLevel::Info, &format!("{} pass done", phase.as_str()));
    }
}

/// Every frame must share one set of dimensions; anything else is an
/// integration bug upstream.
fn validate_dimensions(frames: &[Frame]) -> Result<(), DenoiseError> {
    let Some(first) = frames.first() else {
        return Ok(());
    };
    if first.is_empty() {
        return Err(DenoiseError::EmptyFrame);
    }
    for frame in frames {
        if frame.rows() != first.rows() || frame.cols() != first.cols() {
            return Err(DenoiseError::DimensionMismatch {
                expected_rows: first.rows(),
                expected_cols: first.cols(),
                rows: frame.rows(),
                cols: frame.cols(),
            });
        }
    }
    Ok(())
}

/// Shared per-phase progress counter with throttled reporting.
struct PhaseProgress<'a> {
    reporter: &'a ProgressReporter,
    phase: Phase,
    total: usize,
    done: AtomicUsize,
    started: Instant,
    last_sent: Mutex<Instant>,
}

impl<'a> PhaseProgress<'a> {
    fn new(reporter: &'a ProgressReporter, phase: Phase, total: usize) -> Self {
        Self {
            reporter,
            phase,
            total,
            done: AtomicUsize::new(0),
            started: Instant::now(),
            last_sent: Mutex::new(Instant::now()),
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let mut last = self.last_sent.lock().unwrap();
        if last.elapsed() >= PROGRESS_INTERVAL || done == self.total {
            let elapsed = self.started.elapsed().as_secs_f64();
            let fps = if elapsed > 0.0 { done as f64 / elapsed } else { 0.0 };
            let eta = estimate_eta(fps, done, self.total);
            self.reporter
                .send_progress(&ProgressInfo::new(self.phase, done, self.total, fps, eta));
            *last = Instant::now();
        }
    }
}

/// Seconds left at the current rate; 0.0 when the rate is unknown or the
/// phase is finished.
fn estimate_eta(fps: f64, done: usize, total: usize) -> f64 {
    if fps <= 0.0 || done >= total {
        return 0.0;
    }
    (total - done) as f64 / fps
}
