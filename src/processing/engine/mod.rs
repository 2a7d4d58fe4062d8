//! Decode → re-encode conversion via the `image` crate.
//!
//! # Architecture
//!
//! - [`ConversionEngine`]: Async entry point; runs codec work on tokio's blocking pool.
//! - [`encoders`]: Maps an [`OutputFormat`](crate::utils::OutputFormat) and quality to an encoder call.

mod executor;
mod encoders;

pub use executor::ConversionEngine;
pub use encoders::{encode, jpeg_quality};
