// Upstream scheduling system: the emulator and the ways of reaching it

pub mod emulator;
pub mod local;
pub mod pms_client;

pub use emulator::{Appointment, SourceEmulator};
pub use local::LocalPmsSource;
pub use pms_client::HttpPmsClient;

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::config::{Config, UpstreamMode};
use crate::error::Result;
use crate::metrics::SourcesMetrics;

/// Raw upstream record, shape unknown until the normalizer classifies it
pub type RawSlotData = Value;

/// Core trait that every upstream slot source implements
#[async_trait::async_trait]
pub trait SlotSource: Send + Sync {
    /// Unique identifier for this source, used in logs and metric labels
    fn source_name(&self) -> &'static str;

    /// Fetch every raw appointment record the upstream currently offers
    async fn fetch_records(&self) -> Result<Vec<RawSlotData>>;
}

/// Fetches from `source`, recording timing and outcome
pub async fn fetch_with_metrics(source: &dyn SlotSource) -> Result<Vec<RawSlotData>> {
    let started = Instant::now();
    match source.fetch_records().await {
        Ok(records) => {
            SourcesMetrics::record_fetch_success(
                source.source_name(),
                records.len(),
                started.elapsed().as_secs_f64(),
            );
            info!(source = source.source_name(), "Fetched {} raw records", records.len());
            Ok(records)
        }
        Err(e) => {
            SourcesMetrics::record_fetch_error(source.source_name(), e.kind());
            warn!(source = source.source_name(), "Failed to fetch raw records: {}", e);
            Err(e)
        }
    }
}

/// Builds the slot source selected by `config.upstream.mode`
pub fn create_source(config: &Config, emulator: Arc<SourceEmulator>) -> Result<Arc<dyn SlotSource>> {
    let source: Arc<dyn SlotSource> = match config.upstream.mode {
        UpstreamMode::Http => Arc::new(HttpPmsClient::from_config(config)?),
        UpstreamMode::Local => Arc::new(LocalPmsSource::new(emulator)),
    };
    info!("Using upstream source '{}'", source.source_name());
    Ok(source)
}
