//! Conversion items and their lifecycle status.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::utils::{OutputFormat, converted_file_name};

/// Stable handle to an item within its registry.
///
/// Ids index admission order and stay valid until the registry is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub(crate) usize);

impl ItemId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a single item within a run.
///
/// `Pending -> Processing -> {Completed | Error}`; the last two are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Display text for a file-list row.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing...",
            Self::Completed => "Completed",
            Self::Error => "Error",
        }
    }
}

/// A raw file handed over by the caller for admission.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Sniffs the leading bytes for a known image signature.
    ///
    /// Lets a caller drop obvious non-images before admission; admission
    /// itself never filters on content.
    pub fn looks_like_image(&self) -> bool {
        sniff_mime(&self.bytes).is_some()
    }
}

pub(crate) fn sniff_mime(bytes: &[u8]) -> Option<String> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

/// One input file tracked through the conversion lifecycle.
///
/// `converted_bytes` is present exactly when `status` is `Completed`. State
/// changes go through the owning registry only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionItem {
    id: ItemId,
    source_name: String,
    #[serde(skip)]
    source_bytes: Arc<[u8]>,
    source_size: u64,
    /// MIME type sniffed at admission, if the bytes carry a known signature
    source_mime: Option<String>,
    status: ItemStatus,
    #[serde(skip)]
    converted_bytes: Option<Arc<[u8]>>,
    converted_size: u64,
    converted_format: Option<OutputFormat>,
    error: Option<String>,
}

impl ConversionItem {
    pub(crate) fn admit(id: ItemId, file: SourceFile) -> Self {
        let source_size = file.size();
        let source_mime = sniff_mime(&file.bytes);
        Self {
            id,
            source_name: file.name,
            source_bytes: file.bytes.into(),
            source_size,
            source_mime,
            status: ItemStatus::Pending,
            converted_bytes: None,
            converted_size: 0,
            converted_format: None,
            error: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn source_bytes(&self) -> &[u8] {
        &self.source_bytes
    }

    pub(crate) fn shared_source(&self) -> Arc<[u8]> {
        Arc::clone(&self.source_bytes)
    }

    pub fn source_size(&self) -> u64 {
        self.source_size
    }

    pub fn source_mime(&self) -> Option<&str> {
        self.source_mime.as_deref()
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn converted_bytes(&self) -> Option<&[u8]> {
        self.converted_bytes.as_deref()
    }

    pub(crate) fn shared_converted(&self) -> Option<Arc<[u8]>> {
        self.converted_bytes.clone()
    }

    pub fn converted_size(&self) -> u64 {
        self.converted_size
    }

    /// Format the stored output was encoded with.
    pub fn converted_format(&self) -> Option<OutputFormat> {
        self.converted_format
    }

    /// Failure message of the last attempt, when the item ended in `Error`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Download name for the converted output, once there is one.
    pub fn converted_name(&self) -> Option<String> {
        self.converted_format
            .map(|format| converted_file_name(&self.source_name, format))
    }

    /// Percentage decrease from source to converted size; negative when output grew.
    pub fn reduction_pct(&self) -> Option<f64> {
        if self.status != ItemStatus::Completed || self.source_size == 0 {
            return None;
        }
        let saved = self.source_size as f64 - self.converted_size as f64;
        Some(saved / self.source_size as f64 * 100.0)
    }

    pub(crate) fn set_processing(&mut self) {
        self.status = ItemStatus::Processing;
        self.error = None;
    }

    pub(crate) fn set_completed(&mut self, bytes: Vec<u8>, format: OutputFormat) {
        self.converted_size = bytes.len() as u64;
        self.converted_bytes = Some(bytes.into());
        self.converted_format = Some(format);
        self.status = ItemStatus::Completed;
    }

    pub(crate) fn set_failed(&mut self, error: String) {
        self.converted_bytes = None;
        self.converted_size = 0;
        self.converted_format = None;
        self.error = Some(error);
        self.status = ItemStatus::Error;
    }

    pub(crate) fn set_pending(&mut self) {
        self.converted_bytes = None;
        self.converted_size = 0;
        self.converted_format = None;
        self.error = None;
        self.status = ItemStatus::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_admitted_item_is_pending() {
        let item = ConversionItem::admit(ItemId(0), SourceFile::new("a.png", vec![1, 2, 3]));
        assert_eq!(item.status(), ItemStatus::Pending);
        assert_eq!(item.source_size(), 3);
        assert!(item.converted_bytes().is_none());
        assert_eq!(item.converted_size(), 0);
        assert_eq!(item.reduction_pct(), None);
        assert_eq!(item.source_mime(), None);
    }

    #[test]
    fn test_mime_sniffing() {
        let file = SourceFile::new("a.png", PNG_SIGNATURE.to_vec());
        assert!(file.looks_like_image());
        let item = ConversionItem::admit(ItemId(0), file);
        assert_eq!(item.source_mime(), Some("image/png"));

        assert!(!SourceFile::new("notes.txt", b"hello world".to_vec()).looks_like_image());
    }

    #[test]
    fn test_converted_bytes_follow_status() {
        let mut item = ConversionItem::admit(ItemId(0), SourceFile::new("a.png", vec![0; 200]));
        item.set_processing();
        item.set_completed(vec![0; 50], OutputFormat::Jpeg);
        assert_eq!(item.status(), ItemStatus::Completed);
        assert_eq!(item.converted_size(), 50);
        assert_eq!(item.converted_name().as_deref(), Some("a_converted.jpg"));
        assert_eq!(item.reduction_pct(), Some(75.0));

        item.set_failed("boom".into());
        assert_eq!(item.status(), ItemStatus::Error);
        assert!(item.converted_bytes().is_none());
        assert_eq!(item.converted_size(), 0);
        assert_eq!(item.error(), Some("boom"));

        item.set_pending();
        assert_eq!(item.status(), ItemStatus::Pending);
        assert_eq!(item.error(), None);
    }

    #[test]
    fn test_growth_gives_negative_reduction() {
        let mut item = ConversionItem::admit(ItemId(0), SourceFile::new("a.gif", vec![0; 100]));
        item.set_processing();
        item.set_completed(vec![0; 150], OutputFormat::Png);
        assert_eq!(item.reduction_pct(), Some(-50.0));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ItemStatus::Processing.label(), "Processing...");
        assert!(ItemStatus::Error.is_terminal());
        assert!(!ItemStatus::Processing.is_terminal());
    }

    #[test]
    fn test_serialized_view_skips_bytes() {
        let item = ConversionItem::admit(ItemId(4), SourceFile::new("a.png", vec![9; 10]));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["sourceName"], "a.png");
        assert_eq!(json["sourceSize"], 10);
        assert_eq!(json["status"], "pending");
        assert!(json.get("sourceBytes").is_none());
        assert!(json.get("convertedBytes").is_none());
    }
}
