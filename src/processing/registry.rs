use std::collections::HashSet;
use serde::Serialize;
use tracing::debug;

use crate::core::{ConversionItem, ItemId, ItemStatus, SourceFile};
use crate::utils::{ConverterError, ConverterResult, OutputFormat};

/// Outcome of one [`ItemRegistry::admit`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdmitSummary {
    pub admitted: usize,
    /// Files dropped because an item with the same name and size is already queued
    pub skipped: usize,
}

/// A status change requested by the batch processor.
#[derive(Debug)]
pub(crate) enum Transition {
    Start,
    Complete { bytes: Vec<u8>, format: OutputFormat },
    Fail { error: String },
}

/// Arena of queued items addressed by [`ItemId`].
///
/// Items keep admission order. `(name, size)` is unique across the registry.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: Vec<ConversionItem>,
    keys: HashSet<(String, u64)>,
    /// Completed items in completion order
    converted: Vec<ItemId>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, files: impl IntoIterator<Item = SourceFile>) -> AdmitSummary {
        let mut summary = AdmitSummary::default();

        for file in files {
            let key = (file.name.clone(), file.size());
            if self.keys.contains(&key) {
                debug!("Skipping duplicate file: {} ({} bytes)", key.0, key.1);
                summary.skipped += 1;
                continue;
            }

            let item = ConversionItem::admit(ItemId(self.items.len()), file);
            debug!(
                "Admitted {} {} ({} bytes, {})",
                item.id(),
                item.source_name(),
                item.source_size(),
                item.source_mime().unwrap_or("unknown type")
            );
            self.keys.insert(key);
            self.items.push(item);
            summary.admitted += 1;
        }

        summary
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            debug!("Clearing {} items", self.items.len());
        }
        self.items.clear();
        self.keys.clear();
        self.converted.clear();
    }

    pub fn list(&self) -> &[ConversionItem] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&ConversionItem> {
        self.items.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + use<> {
        (0..self.items.len()).map(ItemId)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|item| item.status() == status).count()
    }

    /// Completed items in the order they finished.
    pub fn converted(&self) -> impl Iterator<Item = &ConversionItem> {
        self.converted.iter().filter_map(|id| self.items.get(id.0))
    }

    /// Puts every item back to `Pending` and forgets all converted output.
    pub(crate) fn reset_for_run(&mut self) {
        for item in &mut self.items {
            item.set_pending();
        }
        self.converted.clear();
    }

    /// Applies a status change, rejecting transitions the lifecycle does not allow.
    pub(crate) fn apply(&mut self, id: ItemId, transition: Transition) -> ConverterResult<&ConversionItem> {
        let item = self
            .items
            .get_mut(id.0)
            .ok_or_else(|| ConverterError::State(format!("Unknown item {id}")))?;

        match (item.status(), transition) {
            (ItemStatus::Pending, Transition::Start) => item.set_processing(),
            (ItemStatus::Processing, Transition::Complete { bytes, format }) => {
                item.set_completed(bytes, format);
                self.converted.push(id);
            }
            (ItemStatus::Processing, Transition::Fail { error }) => item.set_failed(error),
            (status, transition) => {
                return Err(ConverterError::State(format!(
                    "Illegal transition {transition:?} for item {id} in status {status:?}"
                )));
            }
        }

        Ok(&self.items[id.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> SourceFile {
        SourceFile::new(name, vec![0u8; size])
    }

    #[test]
    fn test_dedup_by_name_and_size() {
        let mut registry = ItemRegistry::new();
        let first = registry.admit([file("a.png", 100), file("a.png", 100)]);
        assert_eq!(first, AdmitSummary { admitted: 1, skipped: 1 });

        let second = registry.admit([file("a.png", 100)]);
        assert_eq!(second, AdmitSummary { admitted: 0, skipped: 1 });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_name_other_size_is_distinct() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("a.png", 100), file("a.png", 101), file("b.png", 100)]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_admission_order_is_stable() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("c.png", 1), file("a.png", 2)]);
        registry.admit([file("b.png", 3)]);

        let names: Vec<_> = registry.list().iter().map(|i| i.source_name()).collect();
        assert_eq!(names, ["c.png", "a.png", "b.png"]);
        let ids: Vec<_> = registry.ids().map(|id| id.index()).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn test_clear_allows_readmission() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("a.png", 10)]);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.admit([file("a.png", 10)]).admitted, 1);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("a.png", 10), file("b.png", 10)]);
        let (a, b) = (ItemId(0), ItemId(1));

        registry.apply(a, Transition::Start).unwrap();
        let done = registry
            .apply(a, Transition::Complete { bytes: vec![1, 2, 3], format: OutputFormat::Png })
            .unwrap();
        assert_eq!(done.status(), ItemStatus::Completed);

        registry.apply(b, Transition::Start).unwrap();
        registry.apply(b, Transition::Fail { error: "bad".into() }).unwrap();

        assert_eq!(registry.count(ItemStatus::Completed), 1);
        assert_eq!(registry.count(ItemStatus::Error), 1);
        let converted: Vec<_> = registry.converted().map(|i| i.id()).collect();
        assert_eq!(converted, [a]);
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("a.png", 10)]);
        let id = ItemId(0);

        let complete = Transition::Complete { bytes: vec![], format: OutputFormat::Jpeg };
        assert!(matches!(registry.apply(id, complete), Err(ConverterError::State(_))));

        registry.apply(id, Transition::Start).unwrap();
        assert!(registry.apply(id, Transition::Start).is_err());
        registry.apply(id, Transition::Fail { error: "x".into() }).unwrap();
        assert!(registry.apply(id, Transition::Fail { error: "y".into() }).is_err());
        assert!(registry.apply(ItemId(7), Transition::Start).is_err());
    }

    #[test]
    fn test_reset_for_run() {
        let mut registry = ItemRegistry::new();
        registry.admit([file("a.png", 10)]);
        registry.apply(ItemId(0), Transition::Start).unwrap();
        registry
            .apply(ItemId(0), Transition::Complete { bytes: vec![1], format: OutputFormat::Jpeg })
            .unwrap();

        registry.reset_for_run();
        assert_eq!(registry.count(ItemStatus::Pending), 1);
        assert_eq!(registry.converted().count(), 0);
        assert!(registry.list()[0].converted_bytes().is_none());
    }
}
