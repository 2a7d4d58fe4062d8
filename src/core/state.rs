//! Session state owned by the caller.
//!
//! A [`ConversionSession`] bundles the item registry, the live batch
//! configuration, registered progress observers and the statistics of the
//! last run. It is passed by reference into [`BatchProcessor::run`]; nothing
//! here is process-global.
//!
//! [`BatchProcessor::run`]: crate::processing::BatchProcessor::run

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::core::{
    BatchConfig, BatchStatistics, ConversionItem, ConvertedOutput, ItemId, Progress, SourceFile,
};
use crate::processing::{AdmitSummary, BatchProcessor, ItemRegistry};
use crate::utils::{ConverterError, ConverterResult, OutputFormat, validate_config, validate_quality};

type Observer = Box<dyn Fn(&Progress) + Send + Sync>;

/// Shared, live view of a session's [`BatchConfig`].
///
/// Clones point at the same settings, so a UI can hold one and change the
/// format or quality while a run is in flight.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<BatchConfig>>,
}

impl ConfigHandle {
    pub fn new(config: BatchConfig) -> ConverterResult<Self> {
        validate_config(&config)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
        })
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> ConverterResult<BatchConfig> {
        Ok(self.inner.read()?.clone())
    }

    pub fn set_output_format(&self, format: OutputFormat) -> ConverterResult<()> {
        self.inner.write()?.output_format = format;
        debug!("Output format set to {}", format);
        Ok(())
    }

    pub fn set_quality(&self, quality: f32) -> ConverterResult<()> {
        validate_quality(quality)?;
        self.inner.write()?.quality = quality;
        debug!("Quality set to {:.2}", quality);
        Ok(())
    }

    pub fn replace(&self, config: BatchConfig) -> ConverterResult<()> {
        validate_config(&config)?;
        *self.inner.write()? = config;
        Ok(())
    }
}

/// Requests that a run stop before its next item.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// One conversion session: queued items, settings and the last run's summary.
#[derive(Default)]
pub struct ConversionSession {
    registry: ItemRegistry,
    config: ConfigHandle,
    cancel: CancelHandle,
    observers: Vec<Observer>,
    last_statistics: Option<BatchStatistics>,
}

impl fmt::Debug for ConversionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionSession")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("last_statistics", &self.last_statistics)
            .finish()
    }
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BatchConfig) -> ConverterResult<Self> {
        Ok(Self {
            config: ConfigHandle::new(config)?,
            ..Self::default()
        })
    }

    // ── Item registry ─────────────────────────────────────────────────────────────────

    /// Queues files as `Pending`, silently skipping any whose `(name, size)` is already queued.
    pub fn admit(&mut self, files: impl IntoIterator<Item = SourceFile>) -> AdmitSummary {
        self.registry.admit(files)
    }

    /// Drops every item, every converted output and the last statistics.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.last_statistics = None;
    }

    /// Items in admission order.
    pub fn list(&self) -> &[ConversionItem] {
        self.registry.list()
    }

    pub fn item(&self, id: ItemId) -> Option<&ConversionItem> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ItemRegistry {
        &mut self.registry
    }

    // ── Configuration ─────────────────────────────────────────────────────────────────

    pub fn config(&self) -> ConverterResult<BatchConfig> {
        self.config.get()
    }

    pub fn config_handle(&self) -> ConfigHandle {
        self.config.clone()
    }

    pub fn set_output_format(&self, format: OutputFormat) -> ConverterResult<()> {
        self.config.set_output_format(format)
    }

    pub fn set_quality(&self, quality: f32) -> ConverterResult<()> {
        self.config.set_quality(quality)
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // ── Progress ──────────────────────────────────────────────────────────────────────

    /// Registers an observer that receives every progress event of later runs.
    pub fn on_progress(&mut self, observer: impl Fn(&Progress) + Send + Sync + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub(crate) fn notify(&self, progress: &Progress) {
        for observer in &self.observers {
            observer(progress);
        }
    }

    // ── Results ───────────────────────────────────────────────────────────────────────

    pub fn last_statistics(&self) -> Option<&BatchStatistics> {
        self.last_statistics.as_ref()
    }

    pub(crate) fn record_statistics(&mut self, statistics: BatchStatistics) {
        self.last_statistics = Some(statistics);
    }

    /// Converted output for the first completed item admitted under `name`.
    pub fn converted_item(&self, name: &str) -> ConverterResult<ConvertedOutput> {
        self.registry
            .converted()
            .find(|item| item.source_name() == name)
            .and_then(to_output)
            .ok_or_else(|| ConverterError::NotFound(name.to_string()))
    }

    /// Every converted output, in the order the items completed.
    pub fn converted_items(&self) -> Vec<ConvertedOutput> {
        self.registry.converted().filter_map(to_output).collect()
    }
}

fn to_output(item: &ConversionItem) -> Option<ConvertedOutput> {
    let bytes = item.shared_converted()?;
    let format = item.converted_format()?;
    Some(ConvertedOutput {
        file_name: item.converted_name()?,
        source_name: item.source_name().to_string(),
        format,
        size: item.converted_size(),
        bytes,
    })
}

/// Session shared between tasks, e.g. a UI event loop and a worker.
///
/// Only one run may hold the session at a time; a second [`try_run`] fails
/// with [`ConverterError::Busy`] instead of queueing. Config and cancel
/// handles live outside the lock so they stay usable mid-run.
///
/// [`try_run`]: SessionHandle::try_run
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<ConversionSession>>,
    config: ConfigHandle,
    cancel: CancelHandle,
}

impl SessionHandle {
    pub fn new(session: ConversionSession) -> Self {
        let config = session.config_handle();
        let cancel = session.cancel_handle();
        Self {
            session: Arc::new(Mutex::new(session)),
            config,
            cancel,
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn cancel_handle(&self) -> &CancelHandle {
        &self.cancel
    }

    /// Waits for exclusive access to the session.
    pub async fn lock(&self) -> MutexGuard<'_, ConversionSession> {
        self.session.lock().await
    }

    /// Runs `processor` over the session, rejecting the call if a run is already in progress.
    pub async fn try_run(&self, processor: &BatchProcessor) -> ConverterResult<BatchStatistics> {
        let mut session = self.session.try_lock().map_err(|_| ConverterError::Busy)?;
        processor.run(&mut session).await
    }
}
