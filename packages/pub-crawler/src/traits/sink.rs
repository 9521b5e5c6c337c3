//! Record output.

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::types::Record;

/// Receives the records of each page as the crawl produces them.
///
/// `accept` is called once per page with at least one record, from a single
/// task, so implementations see pages one at a time. A failing call is
/// logged by the traversal and does not stop the crawl.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn accept(&self, records: &[Record]) -> SinkResult<()>;

    /// Flush buffered output. Called once when the crawl ends.
    async fn flush(&self) -> SinkResult<()> {
        Ok(())
    }
}
