mod batch;
mod registry;
pub mod engine;

pub use batch::{BatchProcessor, RunOptions};
pub use engine::ConversionEngine;
pub use registry::{AdmitSummary, ItemRegistry};
