//! Core types and session state.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`ConversionSession`]: Caller-owned session (items, settings, observers)
//! - [`ConversionItem`]: One input file and its conversion lifecycle
//! - [`BatchConfig`]: Output format and quality for conversions
//! - [`BatchStatistics`]: Summary of a finished run
//! - [`Progress`]: Progress events emitted during a run

mod item;
mod types;
mod progress;
mod statistics;
mod state;

pub use item::{ConversionItem, ItemId, ItemStatus, SourceFile};
pub use types::{BatchConfig, ConvertedOutput};
pub use progress::{Progress, ProgressType};
pub use statistics::BatchStatistics;
pub use state::{CancelHandle, ConfigHandle, ConversionSession, SessionHandle};
