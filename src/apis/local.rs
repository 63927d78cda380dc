use serde_json::Value;
use std::sync::Arc;

use super::{SlotSource, SourceEmulator};
use crate::error::Result;

/// Reaches the emulator in-process, skipping the HTTP hop
pub struct LocalPmsSource {
    emulator: Arc<SourceEmulator>,
}

impl LocalPmsSource {
    pub fn new(emulator: Arc<SourceEmulator>) -> Self {
        Self { emulator }
    }
}

#[async_trait::async_trait]
impl SlotSource for LocalPmsSource {
    fn source_name(&self) -> &'static str {
        "local_emulator"
    }

    async fn fetch_records(&self) -> Result<Vec<Value>> {
        self.emulator.generate_messy_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_source_returns_emulator_records() {
        let emulator = Arc::new(SourceEmulator::default());
        let source = LocalPmsSource::new(emulator.clone());

        let records = source.fetch_records().await.unwrap();

        assert_eq!(records.len(), emulator.appointments().len());
        assert_eq!(source.source_name(), "local_emulator");
    }
}
