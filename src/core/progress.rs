use serde::{Deserialize, Serialize};
use crate::core::{ConversionItem, ItemId, ItemStatus};

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
    Error,
    Cancelled,
}

/// Progress event delivered to observers during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete, error, cancelled)
    pub progress_type: ProgressType,
    /// Number of items that reached a terminal status
    pub completed_tasks: usize,
    /// Number of items in the run
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// Current status message
    pub status: String,
    /// Item the event refers to, if any
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_status: Option<ItemStatus>,
    /// Optional error message
    #[serde(default)]
    pub error: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(
        progress_type: ProgressType,
        completed_tasks: usize,
        total_tasks: usize,
        status: &str,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            progress_type,
            completed_tasks,
            total_tasks,
            progress_percentage,
            status: status.to_string(),
            item_id: None,
            item_name: None,
            item_status: None,
            error: None,
        }
    }

    /// Event for an item that just reached a terminal status.
    pub fn for_item(item: &ConversionItem, completed_tasks: usize, total_tasks: usize) -> Self {
        let (progress_type, status) = match item.status() {
            ItemStatus::Error => (ProgressType::Error, format!("{} failed", item.source_name())),
            _ => (ProgressType::Progress, format!("{} converted", item.source_name())),
        };

        Self {
            item_id: Some(item.id()),
            item_name: Some(item.source_name().to_string()),
            item_status: Some(item.status()),
            error: item.error().map(str::to_string),
            ..Self::new(progress_type, completed_tasks, total_tasks, &status)
        }
    }

    /// Completed share of the run in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceFile;

    #[test]
    fn test_fraction_and_percentage() {
        let progress = Progress::new(ProgressType::Progress, 1, 3, "working");
        assert_eq!(progress.progress_percentage, 33);
        assert!((progress.fraction() - 1.0 / 3.0).abs() < f64::EPSILON);

        let empty = Progress::new(ProgressType::Start, 0, 0, "nothing");
        assert_eq!(empty.fraction(), 0.0);
        assert_eq!(empty.progress_percentage, 0);
    }

    #[test]
    fn test_item_event_carries_failure() {
        let mut item = ConversionItem::admit(ItemId(2), SourceFile::new("bad.png", vec![0; 8]));
        item.set_processing();
        item.set_failed("Decode error: garbage".into());

        let progress = Progress::for_item(&item, 3, 3);
        assert_eq!(progress.progress_type, ProgressType::Error);
        assert_eq!(progress.item_id, Some(ItemId(2)));
        assert_eq!(progress.item_status, Some(ItemStatus::Error));
        assert_eq!(progress.error.as_deref(), Some("Decode error: garbage"));
        assert_eq!(progress.fraction(), 1.0);
    }
}
