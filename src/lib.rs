//! Lumaclean Worker Library
//!
//! Adaptive spatio-temporal denoising for grayscale video: a within-frame
//! pass driven by edge/noise/variance classification, followed by an
//! across-frame pass that judges each pixel against its recent history.

pub mod codec;
pub mod error;
pub mod frame;
pub mod models;
pub mod pipeline;
pub mod progress_reporter;
pub mod spatial;
pub mod stats;
pub mod temporal;

pub use error::DenoiseError;
pub use frame::{Frame, Neighborhood, PixelPatch, Sequence};
pub use pipeline::DenoisePipeline;
