//! Parameters for the across-frame (temporal) denoising pass.

use serde::{Deserialize, Serialize};

/// Tunable thresholds for the temporal anomaly classifiers and the adaptive
/// temporal filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalParameters {
    /// Number of preceding (already spatially denoised) frames consulted
    /// as history per pixel.
    #[serde(default = "default_previous_frames")]
    pub previous_frames: usize,

    /// Gradient magnitude above which a pixel is a spatial edge and its
    /// current value is kept untouched.
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: f64,

    /// Minimum `median(history) - current` for a blur candidate.
    #[serde(default = "default_blur_delta")]
    pub blur_delta: f64,

    /// Blur only applies to dark pixels: current must be below this.
    #[serde(default = "default_blur_ceiling")]
    pub blur_ceiling: u8,

    /// Minimum `current - median(history)` for a flare candidate.
    #[serde(default = "default_flare_delta")]
    pub flare_delta: f64,

    /// Flare only applies to bright pixels: current must exceed this.
    #[serde(default = "default_flare_floor")]
    pub flare_floor: u8,

    /// Max difference for two history values to count as a similar pair.
    #[serde(default = "default_pair_threshold")]
    pub pair_threshold: u8,

    /// Stability ratio above which the history is a trustworthy baseline.
    #[serde(default = "default_stability_ratio")]
    pub stability_ratio: f64,

    /// Deviation from the history median that flags the current value as
    /// temporal noise (only when the history is stable).
    #[serde(default = "default_noise_threshold")]
    pub noise_threshold: f64,

    /// History variance above which the pixel is considered moving.
    #[serde(default = "default_movement_variance")]
    pub movement_variance: f64,

    /// History variance below which the stable low-movement blend applies.
    #[serde(default = "default_stable_variance")]
    pub stable_variance: f64,

    /// Correction weight for blur and flare repairs.
    #[serde(default = "default_correction_blend")]
    pub correction_blend: f64,

    /// Median weight when replacing temporal noise.
    #[serde(default = "default_noise_blend")]
    pub noise_blend: f64,
}

fn default_previous_frames() -> usize { 23 }
fn default_edge_threshold() -> f64 { 20.0 }
fn default_blur_delta() -> f64 { 40.0 }
fn default_blur_ceiling() -> u8 { 60 }
fn default_flare_delta() -> f64 { 50.0 }
fn default_flare_floor() -> u8 { 180 }
fn default_pair_threshold() -> u8 { 4 }
fn default_stability_ratio() -> f64 { 0.6 }
fn default_noise_threshold() -> f64 { 10.0 }
fn default_movement_variance() -> f64 { 30.0 }
fn default_stable_variance() -> f64 { 20.0 }
fn default_correction_blend() -> f64 { 0.8 }
fn default_noise_blend() -> f64 { 0.7 }

impl Default for TemporalParameters {
    fn default() -> Self {
        Self {
            previous_frames: default_previous_frames(),
            edge_threshold: default_edge_threshold(),
            blur_delta: default_blur_delta(),
            blur_ceiling: default_blur_ceiling(),
            flare_delta: default_flare_delta(),
            flare_floor: default_flare_floor(),
            pair_threshold: default_pair_threshold(),
            stability_ratio: default_stability_ratio(),
            noise_threshold: default_noise_threshold(),
            movement_variance: default_movement_variance(),
            stable_variance: default_stable_variance(),
            correction_blend: default_correction_blend(),
            noise_blend: default_noise_blend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = TemporalParameters::default();
        assert_eq!(params.previous_frames, 23);
        assert_eq!(params.pair_threshold, 4);
        assert_eq!(params.stability_ratio, 0.6);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let params: TemporalParameters =
            serde_json::from_str("{\"previousFrames\":3,\"noiseThreshold\":8.0}").unwrap();
        assert_eq!(params.previous_frames, 3);
        assert_eq!(params.noise_threshold, 8.0);
        assert_eq!(params.blur_delta, 40.0);
    }
}
