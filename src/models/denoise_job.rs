//! Denoise job configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SpatialParameters, TemporalParameters};

/// A complete denoising job as received from the controlling application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenoiseJob {
    /// Unique job identifier.
    pub id: Uuid,

    /// Input video file path.
    pub input_path: String,

    /// Output video file path.
    pub output_path: String,

    /// Output frame rate.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Optional trim applied after decode, before any filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_range: Option<FrameRange>,

    /// Spatial pass parameters.
    #[serde(default)]
    pub spatial: SpatialParameters,

    /// Temporal pass parameters.
    #[serde(default)]
    pub temporal: TemporalParameters,
}

fn default_frame_rate() -> f64 { 24.0 }

/// Half-open frame index range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRange {
    pub start: usize,
    pub end: usize,
}

impl FrameRange {
    /// Clamp the range to a sequence length.
    pub fn clamp_to(&self, len: usize) -> (usize, usize) {
        let start = self.start.min(len);
        let end = self.end.min(len).max(start);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_job_json() {
        let json = format!(
            "{{\"id\":\"{}\",\"inputPath\":\"in.mp4\",\"outputPath\":\"out.mp4\"}}",
            Uuid::new_v4()
        );
        let job: DenoiseJob = serde_json::from_str(&json).unwrap();
        assert_eq!(job.frame_rate, 24.0);
        assert_eq!(job.spatial.radius, 4);
        assert_eq!(job.temporal.previous_frames, 23);
        assert!(job.frame_range.is_none());
    }

    #[test]
    fn test_frame_range_clamp() {
        let range = FrameRange { start: 400, end: 640 };
        assert_eq!(range.clamp_to(1000), (400, 640));
        assert_eq!(range.clamp_to(500), (400, 500));
        assert_eq!(range.clamp_to(100), (100, 100));
    }

    #[test]
    fn test_serialization_round_trip() {
        let job = DenoiseJob {
            id: Uuid::new_v4(),
            input_path: "a.mp4".to_string(),
            output_path: "b.mp4".to_string(),
            frame_rate: 30.0,
            frame_range: Some(FrameRange { start: 0, end: 10 }),
            spatial: SpatialParameters::default(),
            temporal: TemporalParameters::default(),
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"inputPath\":\"a.mp4\""));
        let back: DenoiseJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame_rate, 30.0);
    }
}
