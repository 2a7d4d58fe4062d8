mod config;
mod processor;

pub use config::RunOptions;
pub use processor::BatchProcessor;
