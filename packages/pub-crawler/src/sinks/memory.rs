//! In-memory record sink.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::SinkResult;
use crate::traits::sink::RecordSink;
use crate::types::Record;

/// Collects every accepted record. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<RwLock<Vec<Record>>>,
    batches: Arc<RwLock<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records so far, in arrival order.
    pub fn records(&self) -> Vec<Record> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `accept` calls (one per page with records).
    pub fn batch_count(&self) -> usize {
        *self.batches.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records taken from `source_url`.
    pub fn records_from(&self, source_url: &str) -> Vec<Record> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.source_url == source_url)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn accept(&self, records: &[Record]) -> SinkResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(records);
        *self.batches.write().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
