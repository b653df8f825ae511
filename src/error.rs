//! Error taxonomy for the denoising core.
//!
//! Precondition violations (empty frames, out-of-range coordinates,
//! mismatched dimensions) fail fast and abort the unit of work. Designed-for
//! conditions such as short temporal history or an empty neighbor set are
//! handled locally by the filters and never surface here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenoiseError {
    /// A frame or block with no pixels reached a filter that needs them.
    #[error("frame has no pixels")]
    EmptyFrame,

    /// A center coordinate outside the frame bounds.
    #[error("coordinate ({row}, {col}) outside {rows}x{cols} frame")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Frames within a sequence (or rows within a frame) disagree on size.
    #[error("dimension mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// The operator aborted the run.
    #[error("job cancelled")]
    Cancelled,
}
