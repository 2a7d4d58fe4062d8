use std::time::Instant;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::{BatchStatistics, ConversionSession, ItemId, Progress, ProgressType};
use crate::processing::engine::ConversionEngine;
use crate::processing::registry::Transition;
use crate::utils::{ConverterError, ConverterResult, OutputFormat};

use super::config::RunOptions;

/// Drives the conversion engine over every item of a session, one at a time.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    engine: ConversionEngine,
    options: RunOptions,
}

impl BatchProcessor {
    pub fn new(options: RunOptions) -> Self {
        Self {
            engine: ConversionEngine::new(),
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Converts every queued item in admission order and returns the run's statistics.
    ///
    /// Each item moves `Pending -> Processing -> Completed | Error`. A failed item is
    /// recorded and the run moves on; only an empty registry fails the whole call.
    /// Items left over from an earlier run are reset to `Pending` and converted afresh.
    /// The batch config is read as each item starts, so changes made mid-run apply
    /// to the items not yet reached. A cancel request stops the run before the next
    /// item; unreached items stay `Pending`.
    pub async fn run(&self, session: &mut ConversionSession) -> ConverterResult<BatchStatistics> {
        let total = session.registry().len();
        if total == 0 {
            return Err(ConverterError::EmptyBatch);
        }

        session.registry_mut().reset_for_run();
        let cancel = session.cancel_handle();
        cancel.reset();

        let start_time = Utc::now();
        let clock = Instant::now();
        info!("Converting batch of {} items", total);
        session.notify(&Progress::new(ProgressType::Start, 0, total, "Starting conversion"));

        let ids: Vec<ItemId> = session.registry().ids().collect();
        let mut completed = 0;
        let mut cancelled = false;

        for id in ids {
            if cancel.is_cancelled() {
                warn!("Run cancelled after {}/{} items", completed, total);
                cancelled = true;
                break;
            }

            self.process_item(session, id).await?;
            completed += 1;

            if let Some(item) = session.item(id) {
                session.notify(&Progress::for_item(item, completed, total));
            }

            if !self.options.throttle.is_zero() && completed < total {
                tokio::time::sleep(self.options.throttle).await;
            } else {
                tokio::task::yield_now().await;
            }
        }

        let statistics = BatchStatistics::from_items(
            session.list(),
            start_time,
            Utc::now(),
            clock.elapsed(),
            cancelled,
        );

        if statistics.failed_files > 0 {
            warn!(
                "Batch finished with {} failed items out of {}",
                statistics.failed_files, statistics.total_files
            );
        } else if !cancelled {
            info!("Batch finished: {} items converted", statistics.completed_files);
        }
        debug!(
            "{} → {} bytes ({:.1}%) in {:.2}s",
            statistics.original_size,
            statistics.compressed_size,
            statistics.total_reduction_pct(),
            statistics.processing_time_seconds()
        );

        let (progress_type, status) = if cancelled {
            (ProgressType::Cancelled, "Conversion cancelled")
        } else {
            (ProgressType::Complete, "Conversion complete")
        };
        session.notify(&Progress::new(progress_type, completed, total, status));
        session.record_statistics(statistics.clone());

        Ok(statistics)
    }

    /// Runs one item through the engine. Conversion failures end up on the item;
    /// only a broken lifecycle transition is returned as an error.
    async fn process_item(&self, session: &mut ConversionSession, id: ItemId) -> ConverterResult<()> {
        let item = session.registry_mut().apply(id, Transition::Start)?;
        let name = item.source_name().to_string();
        let source = item.shared_source();

        let outcome = self.convert(session, source).await;

        let transition = match outcome {
            Ok((bytes, format)) => {
                debug!("{} converted to {} ({} bytes)", name, format, bytes.len());
                Transition::Complete { bytes, format }
            }
            Err(e) => {
                warn!("Conversion failed for {}: {}", name, e);
                Transition::Fail { error: e.to_string() }
            }
        };

        session.registry_mut().apply(id, transition)?;
        Ok(())
    }

    async fn convert(
        &self,
        session: &ConversionSession,
        source: std::sync::Arc<[u8]>,
    ) -> ConverterResult<(Vec<u8>, OutputFormat)> {
        let config = session.config()?;
        let bytes = self
            .engine
            .convert(source, config.output_format, config.quality)
            .await?;
        Ok((bytes, config.output_format))
    }
}
