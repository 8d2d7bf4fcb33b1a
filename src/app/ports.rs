use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::SourceParams;
use crate::domain::{CustomerRecord, MergedRecord, TransactionRecord};

/// Collaborator that produces raw rows for the extractor. Real
/// implementations would reach a database or HTTP API; the bundled one
/// simulates them.
#[async_trait]
pub trait SourcePort: Send + Sync {
    async fn fetch_customers(&self, params: &SourceParams) -> Result<Vec<CustomerRecord>, String>;
    async fn fetch_transactions(
        &self,
        params: &SourceParams,
    ) -> Result<Vec<TransactionRecord>, String>;
}

#[derive(Clone, Debug)]
pub struct WriteAck {
    pub records_written: usize,
}

/// Collaborator that receives the final merged table. Retry policy belongs
/// here, not in the pipeline.
#[async_trait]
pub trait SinkPort: Send + Sync {
    async fn write(&self, rows: &[MergedRecord], destination: &str) -> Result<WriteAck, String>;
}

/// Time source for derived-field computation. Injected so transform output
/// is deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
