//! Summary of a finished conversion run.

use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::core::{ConversionItem, ItemStatus};

/// Read-only summary of one run, recomputed from scratch when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    /// Items in the registry when the run started
    pub total_files: usize,
    pub completed_files: usize,
    pub failed_files: usize,
    /// Sum of every item's source size, failed items included
    pub original_size: u64,
    /// Sum of converted sizes over completed items only
    pub compressed_size: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Monotonic wall time of the run
    #[serde(serialize_with = "serialize_secs")]
    pub processing_time: Duration,
    /// Set when the run stopped before reaching every item
    pub cancelled: bool,
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

impl BatchStatistics {
    pub fn from_items(
        items: &[ConversionItem],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        processing_time: Duration,
        cancelled: bool,
    ) -> Self {
        let count = |status| items.iter().filter(|item| item.status() == status).count();

        Self {
            total_files: items.len(),
            completed_files: count(ItemStatus::Completed),
            failed_files: count(ItemStatus::Error),
            original_size: items.iter().map(ConversionItem::source_size).sum(),
            compressed_size: items
                .iter()
                .filter(|item| item.status() == ItemStatus::Completed)
                .map(ConversionItem::converted_size)
                .sum(),
            start_time,
            end_time,
            processing_time,
            cancelled,
        }
    }

    pub fn processing_time_seconds(&self) -> f64 {
        self.processing_time.as_secs_f64()
    }

    /// `(original - compressed) / original * 100`; zero for an empty original.
    pub fn total_reduction_pct(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size as f64 - self.compressed_size as f64) / self.original_size as f64 * 100.0
    }

    /// Total reduction spread over the file count.
    pub fn average_reduction_pct(&self) -> f64 {
        self.total_reduction_pct() / self.total_files.max(1) as f64
    }

    /// Bytes saved across the run; negative when outputs grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }
}
