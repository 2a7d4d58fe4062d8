use std::fmt;
use crate::core::{BatchStatistics, ConversionItem, ItemStatus};
use crate::utils::format_bytes;

/// Text summary of a finished run, one value per line.
pub struct StatisticsReport<'a> {
    statistics: &'a BatchStatistics,
    items: &'a [ConversionItem],
}

impl<'a> StatisticsReport<'a> {
    pub fn new(statistics: &'a BatchStatistics) -> Self {
        Self {
            statistics,
            items: &[],
        }
    }

    /// Also lists each item with its status and size change.
    pub fn with_items(mut self, items: &'a [ConversionItem]) -> Self {
        self.items = items;
        self
    }

    fn item_line(item: &ConversionItem) -> String {
        match item.status() {
            ItemStatus::Completed => format!(
                "{} → {} ({} → {}, {:.1}%)",
                item.source_name(),
                item.converted_name().unwrap_or_default(),
                format_bytes(item.source_size()),
                format_bytes(item.converted_size()),
                item.reduction_pct().unwrap_or(0.0)
            ),
            ItemStatus::Error => format!(
                "{} [{}] {}",
                item.source_name(),
                item.status().label(),
                item.error().unwrap_or("")
            ),
            status => format!(
                "{} [{}] {}",
                item.source_name(),
                status.label(),
                format_bytes(item.source_size())
            ),
        }
    }
}

impl fmt::Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.statistics;

        writeln!(f, "=== Conversion Summary ===")?;
        writeln!(f, "Total Files: {}", stats.total_files)?;
        writeln!(f, "Total Size Reduction: {:.1}%", stats.total_reduction_pct())?;
        writeln!(f, "Original Size: {}", format_bytes(stats.original_size))?;
        writeln!(f, "Compressed Size: {}", format_bytes(stats.compressed_size))?;
        writeln!(f, "Processing Time: {:.1}s", stats.processing_time_seconds())?;
        write!(f, "Average Reduction: {:.1}%", stats.average_reduction_pct())?;

        if stats.failed_files > 0 {
            write!(f, "\nFailed: {}", stats.failed_files)?;
        }
        if stats.cancelled {
            write!(f, "\nCancelled before all files were converted")?;
        }

        if !self.items.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Files:")?;
            for item in self.items {
                write!(f, "\n- {}", Self::item_line(item))?;
            }
        }

        Ok(())
    }
}
