// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod reporting;

// Public exports for external consumers
pub use crate::core::{
    BatchConfig, BatchStatistics, CancelHandle, ConfigHandle, ConversionItem, ConversionSession,
    ConvertedOutput, ItemId, ItemStatus, Progress, ProgressType, SessionHandle, SourceFile,
};
pub use crate::processing::{AdmitSummary, BatchProcessor, ConversionEngine, ItemRegistry, RunOptions};
pub use crate::reporting::StatisticsReport;
pub use crate::utils::{ConverterError, ConverterResult, OutputFormat, ValidationError, format_bytes};

// This library file is the public API; the command-line front end lives in main.rs.
