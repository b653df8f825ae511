//! Across-frame adaptive denoising.
//!
//! Each pixel of frame `t` is judged against its history: the values at the
//! same coordinate in the `previous_frames` frames before `t`, which have
//! already been spatially denoised. Frames 0-2 pass through unmodified, and a
//! whole-frame call no-ops while the configured window does not fit.

use crate::error::DenoiseError;
use crate::frame::Frame;
use crate::models::TemporalParameters;
use crate::stats;

/// Frames with an index at or below this always pass through: there is not
/// enough history to classify anything reliably.
pub const MIN_HISTORY_FRAME: usize = 2;

/// Blur: the current value collapsed well below a history that says the
/// pixel should be brighter.
pub fn is_blur(history: &[u8], current: u8, params: &TemporalParameters) -> bool {
    if history.len() < 2 {
        return false;
    }
    let med = stats::median(history) as f64;
    med - current as f64 > params.blur_delta && current < params.blur_ceiling
}

/// Flare: the current value spiked well above a history that says the pixel
/// should be darker.
pub fn is_flare(history: &[u8], current: u8, params: &TemporalParameters) -> bool {
    if history.len() < 2 {
        return false;
    }
    let med = stats::median(history) as f64;
    current as f64 - med > params.flare_delta && current > params.flare_floor
}

/// Temporal noise: the history agrees with itself but the current value
/// strays from its median. A volatile history never flags noise, because it
/// is too unreliable a baseline to judge against.
pub fn is_noise(history: &[u8], current: u8, params: &TemporalParameters) -> bool {
    if history.len() < 2 {
        return false;
    }
    let stability = stats::pair_stability(history, params.pair_threshold);
    if stability <= params.stability_ratio {
        return false;
    }
    let med = stats::median(history) as f64;
    (current as f64 - med).abs() > params.noise_threshold
}

/// Movement: history variance high enough to suggest real scene motion.
pub fn has_movement(history: &[u8], params: &TemporalParameters) -> bool {
    if history.len() < 2 {
        return false;
    }
    stats::variance(history) > params.movement_variance
}

/// Variance-weighted blend toward the history median.
///
/// The quieter the history, the more of the median flows into the result:
/// alpha 0.6 below variance 10, 0.4 below 25, 0.2 otherwise.
pub fn adaptive_filter(history: &[u8], current: u8, variance: f64) -> u8 {
    if history.is_empty() {
        return current;
    }
    let alpha = if variance < 10.0 {
        0.6
    } else if variance < 25.0 {
        0.4
    } else {
        0.2
    };
    stats::blend(stats::median(history) as f64, current, alpha)
}

/// Repair value for a blur: average of the history median and the next
/// higher sorted value, or the median alone when it is the maximum.
fn blur_correction(history: &[u8]) -> f64 {
    let mut sorted = history.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let med = sorted[mid] as f64;
    if mid + 1 < sorted.len() {
        (med + sorted[mid + 1] as f64) / 2.0
    } else {
        med
    }
}

/// Repair value for a flare: average of the history median and the next
/// lower sorted value, or the median alone when it is the minimum.
fn flare_correction(history: &[u8]) -> f64 {
    let mut sorted = history.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let med = sorted[mid] as f64;
    if mid > 0 {
        (med + sorted[mid - 1] as f64) / 2.0
    } else {
        med
    }
}

/// Denoise one line of frame `t`, returning the new pixel values.
///
/// Reads only finalized frames strictly before `t` plus the untouched frame
/// `t` itself, so all lines of one frame may run concurrently.
pub fn denoise_line(
    frames: &[Frame],
    t: usize,
    line: usize,
    params: &TemporalParameters,
) -> Result<Vec<u8>, DenoiseError> {
    let frame = &frames[t];
    if frame.is_empty() {
        return Err(DenoiseError::EmptyFrame);
    }
    if line >= frame.rows() {
        return Err(DenoiseError::OutOfRange {
            row: line,
            col: 0,
            rows: frame.rows(),
            cols: frame.cols(),
        });
    }
    if t <= MIN_HISTORY_FRAME || t < params.previous_frames {
        return Ok(frame.row(line).to_vec());
    }

    let start = t - params.previous_frames;
    let mut output = Vec::with_capacity(frame.cols());
    let mut history = vec![0u8; params.previous_frames];

    for col in 0..frame.cols() {
        let current = frame.get(line, col);

        // Spatial edges on the current frame are left alone outright.
        let block = frame.neighborhood(line, col, 1)?;
        if block.is_edge(params.edge_threshold) {
            output.push(current);
            continue;
        }

        for (i, past) in frames[start..t].iter().enumerate() {
            history[i] = past.get(line, col);
        }
        let variance = stats::variance(&history);

        let value = if is_blur(&history, current, params) {
            stats::blend(blur_correction(&history), current, params.correction_blend)
        } else if is_flare(&history, current, params) {
            stats::blend(flare_correction(&history), current, params.correction_blend)
        } else if is_noise(&history, current, params) {
            stats::blend(stats::median(&history) as f64, current, params.noise_blend)
        } else if variance < params.stable_variance && !has_movement(&history, params) {
            adaptive_filter(&history, current, variance)
        } else {
            // Genuine motion, keep the frame as shot.
            current
        };
        output.push(value);
    }

    Ok(output)
}
