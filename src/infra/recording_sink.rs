use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::ports::{SinkPort, WriteAck};
use crate::domain::MergedRecord;

/// One observed hand-off: how many records were presented to which
/// destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadObservation {
    pub destination: String,
    pub records: usize,
}

/// In-memory sink implementation for development/testing. Only records that
/// a table was presented; performs no real I/O and never fails.
#[derive(Default)]
pub struct RecordingSink {
    observations: Arc<Mutex<Vec<LoadObservation>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> Vec<LoadObservation> {
        self.observations.lock().unwrap().clone()
    }
}

#[async_trait]
impl SinkPort for RecordingSink {
    async fn write(&self, rows: &[MergedRecord], destination: &str) -> Result<WriteAck, String> {
        let observation = LoadObservation {
            destination: destination.to_string(),
            records: rows.len(),
        };
        debug!(
            "Presented {} records to {}",
            observation.records, observation.destination
        );
        self.observations.lock().unwrap().push(observation);

        Ok(WriteAck {
            records_written: rows.len(),
        })
    }
}
