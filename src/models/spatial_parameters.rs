//! Parameters for the within-frame (spatial) denoising pass.

use serde::{Deserialize, Serialize};

/// Tunable thresholds and blend weights for the spatial adaptive filter.
///
/// The defaults are the tuning the reference converged on; every value is
/// configuration rather than a hard-coded constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialParameters {
    /// Half-width of the square neighborhood extracted around each pixel.
    #[serde(default = "default_radius")]
    pub radius: usize,

    /// Gradient magnitude above which a pixel counts as a spatial edge.
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: f64,

    /// Max |neighbor - center| for a neighbor to count as similar.
    #[serde(default = "default_similarity_tolerance")]
    pub similarity_tolerance: u8,

    /// Similarity ratio below which the center is classified as noise.
    #[serde(default = "default_noise_ratio")]
    pub noise_ratio: f64,

    /// Neighbor variance below which a region counts as homogeneous.
    #[serde(default = "default_low_variance")]
    pub low_variance: f64,

    /// Neighbor variance below which moderate smoothing still applies.
    #[serde(default = "default_high_variance")]
    pub high_variance: f64,

    /// Median weight on edges (the rest stays with the current pixel).
    #[serde(default = "default_edge_blend")]
    pub edge_blend: f64,

    /// Mean weight in homogeneous regions.
    #[serde(default = "default_smooth_blend")]
    pub smooth_blend: f64,

    /// Median weight in moderately textured regions.
    #[serde(default = "default_medium_blend")]
    pub medium_blend: f64,

    /// Median weight in highly textured regions.
    #[serde(default = "default_texture_blend")]
    pub texture_blend: f64,
}

fn default_radius() -> usize { 4 }
fn default_edge_threshold() -> f64 { 25.0 }
fn default_similarity_tolerance() -> u8 { 15 }
fn default_noise_ratio() -> f64 { 0.3 }
fn default_low_variance() -> f64 { 50.0 }
fn default_high_variance() -> f64 { 200.0 }
fn default_edge_blend() -> f64 { 0.1 }
fn default_smooth_blend() -> f64 { 0.7 }
fn default_medium_blend() -> f64 { 0.3 }
fn default_texture_blend() -> f64 { 0.05 }

impl Default for SpatialParameters {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            edge_threshold: default_edge_threshold(),
            similarity_tolerance: default_similarity_tolerance(),
            noise_ratio: default_noise_ratio(),
            low_variance: default_low_variance(),
            high_variance: default_high_variance(),
            edge_blend: default_edge_blend(),
            smooth_blend: default_smooth_blend(),
            medium_blend: default_medium_blend(),
            texture_blend: default_texture_blend(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = SpatialParameters::default();
        assert_eq!(params.radius, 4);
        assert_eq!(params.edge_threshold, 25.0);
        assert_eq!(params.similarity_tolerance, 15);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let params: SpatialParameters = serde_json::from_str("{\"radius\":1}").unwrap();
        assert_eq!(params.radius, 1);
        assert_eq!(params.noise_ratio, 0.3);
        assert_eq!(params.high_variance, 200.0);
    }
}
