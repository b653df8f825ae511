//! Data models shared between the controlling app and the worker.
//! These serialize to/from JSON with camelCase field names.

mod denoise_job;
mod progress_info;
mod spatial_parameters;
mod temporal_parameters;

pub use denoise_job::*;
pub use progress_info::*;
pub use spatial_parameters::*;
pub use temporal_parameters::*;
