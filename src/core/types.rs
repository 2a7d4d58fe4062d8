//! Core types for conversion settings and outputs.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::utils::OutputFormat;

/// Settings applied to the conversion of each item.
///
/// Read at the moment an item is converted, so a change during a run affects
/// only the items not yet processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchConfig {
    /// Target encoding
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Quality in `[0.0, 1.0]`; only lossy encoders use it
    #[serde(default = "default_quality")]
    pub quality: f32,
}

fn default_quality() -> f32 {
    0.8
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Jpeg,
            quality: default_quality(),
        }
    }
}

/// A converted file ready to hand back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedOutput {
    /// Derived name, e.g. `photo_converted.jpg`
    pub file_name: String,
    /// Name the source was admitted under
    pub source_name: String,
    pub format: OutputFormat,
    pub size: u64,
    #[serde(skip)]
    pub bytes: Arc<[u8]>,
}
