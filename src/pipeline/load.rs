use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::ports::SinkPort;
use crate::domain::MergedRecord;
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Acknowledgment that a table was presented to a destination.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReceipt {
    pub receipt_id: Uuid,
    pub destination: String,
    pub records_presented: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Presents the final merged table to the destination sink. Sink failures
/// surface unchanged; retry policy, if any, belongs to the sink
/// collaborator.
pub struct Loader {
    sink: Arc<dyn SinkPort>,
}

impl Loader {
    pub fn new(sink: Arc<dyn SinkPort>) -> Self {
        Self { sink }
    }

    pub async fn load(&self, rows: &[MergedRecord], destination: &str) -> Result<LoadReceipt> {
        let ack = self
            .sink
            .write(rows, destination)
            .await
            .map_err(PipelineError::Write)?;

        info!(
            "Presented {} records to '{}'",
            ack.records_written, destination
        );
        metrics::load::records_presented(destination, ack.records_written as u64);

        Ok(LoadReceipt {
            receipt_id: Uuid::new_v4(),
            destination: destination.to_string(),
            records_presented: ack.records_written,
            loaded_at: Utc::now(),
        })
    }
}
