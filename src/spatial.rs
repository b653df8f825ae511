//! Within-frame adaptive denoising.
//!
//! Every pixel is classified from its clipped square neighborhood and blended
//! accordingly. The checks are layered: edge overrides noise overrides the
//! variance tiers, so exactly one branch fires per pixel.

use crate::error::DenoiseError;
use crate::frame::{Frame, Neighborhood, PixelPatch};
use crate::models::SpatialParameters;
use crate::stats;

/// Spatial noise test: the center is noise when too few neighbors sit within
/// the similarity tolerance of it.
pub fn is_noise(block: &Neighborhood, params: &SpatialParameters) -> bool {
    let neighbors = block.neighbors();
    if neighbors.is_empty() {
        return false;
    }
    let ratio = stats::similarity_ratio(block.center_value(), &neighbors, params.similarity_tolerance);
    ratio < params.noise_ratio
}

/// Decide the denoised value for the center of a neighborhood.
///
/// Reads only the block; the caller writes the result into a separate output
/// frame so neighbor computations always see unmodified source values.
pub fn denoise_pixel(block: &Neighborhood, params: &SpatialParameters) -> u8 {
    let current = block.center_value();
    let neighbors = block.neighbors();
    if neighbors.is_empty() {
        return current;
    }

    if block.is_edge(params.edge_threshold) {
        // Edges get only a whisper of the median to avoid smearing detail.
        return stats::blend(stats::median(&neighbors) as f64, current, params.edge_blend);
    }

    if is_noise(block, params) {
        // Isolated outlier: full median replacement.
        return stats::median(&neighbors);
    }

    let variance = stats::variance(&neighbors);
    if variance < params.low_variance {
        // Homogeneous region, smooth hard toward the mean.
        stats::blend(stats::mean(&neighbors), current, params.smooth_blend)
    } else if variance < params.high_variance {
        stats::blend(stats::median(&neighbors) as f64, current, params.medium_blend)
    } else {
        // Busy texture, keep almost everything.
        stats::blend(stats::median(&neighbors) as f64, current, params.texture_blend)
    }
}

/// Denoise a whole frame into a fresh buffer.
///
/// The source frame is read-only throughout; computed values are committed
/// as a patch batch onto a copy.
pub fn denoise_frame(frame: &Frame, params: &SpatialParameters) -> Result<Frame, DenoiseError> {
    if frame.is_empty() {
        return Err(DenoiseError::EmptyFrame);
    }

    let mut patches = Vec::with_capacity(frame.rows() * frame.cols());
    for row in 0..frame.rows() {
        for col in 0..frame.cols() {
            let block = frame.neighborhood(row, col, params.radius)?;
            patches.push(PixelPatch {
                row,
                col,
                value: denoise_pixel(&block, params),
            });
        }
    }

    let mut output = frame.clone();
    output.apply_patches(&patches);
    Ok(output)
}
