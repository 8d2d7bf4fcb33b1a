use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::app::ports::SourcePort;
use crate::config::SourceParams;
use crate::constants;
use crate::domain::{CustomerRecord, TransactionRecord};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;

/// Typed result of extracting one named source.
#[derive(Debug, Clone)]
pub enum ExtractedTable {
    Customers(Vec<CustomerRecord>),
    Transactions(Vec<TransactionRecord>),
}

impl ExtractedTable {
    pub fn len(&self) -> usize {
        match self {
            ExtractedTable::Customers(rows) => rows.len(),
            ExtractedTable::Transactions(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves source names to collaborator calls. The per-source parameters
/// from configuration are handed to the collaborator unmodified; extraction
/// failures are fatal for the run and never retried here.
pub struct Extractor {
    source: Arc<dyn SourcePort>,
    sources: HashMap<String, SourceParams>,
}

impl Extractor {
    pub fn new(source: Arc<dyn SourcePort>, sources: HashMap<String, SourceParams>) -> Self {
        Self { source, sources }
    }

    /// Extract the table behind a recognized source name. Unrecognized names
    /// fail with `UnknownSource`.
    pub async fn extract(&self, source_name: &str) -> Result<ExtractedTable> {
        match source_name {
            constants::DATABASE_SOURCE => {
                Ok(ExtractedTable::Customers(self.extract_customers().await?))
            }
            constants::API_SOURCE => Ok(ExtractedTable::Transactions(
                self.extract_transactions().await?,
            )),
            other => Err(PipelineError::UnknownSource(other.to_string())),
        }
    }

    /// Extract the customer table from the database source.
    pub async fn extract_customers(&self) -> Result<Vec<CustomerRecord>> {
        let params = self.params_for(constants::DATABASE_SOURCE);
        let rows = self
            .source
            .fetch_customers(&params)
            .await
            .map_err(|cause| {
                metrics::extract::extraction_error(constants::DATABASE_SOURCE);
                PipelineError::Extraction(cause)
            })?;

        info!(
            "Extracted {} customer rows from '{}'",
            rows.len(),
            constants::DATABASE_SOURCE
        );
        metrics::extract::rows_extracted(constants::DATABASE_SOURCE, rows.len() as u64);
        Ok(rows)
    }

    /// Extract the transaction table from the api source.
    pub async fn extract_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let params = self.params_for(constants::API_SOURCE);
        let rows = self
            .source
            .fetch_transactions(&params)
            .await
            .map_err(|cause| {
                metrics::extract::extraction_error(constants::API_SOURCE);
                PipelineError::Extraction(cause)
            })?;

        info!(
            "Extracted {} transaction rows from '{}'",
            rows.len(),
            constants::API_SOURCE
        );
        metrics::extract::rows_extracted(constants::API_SOURCE, rows.len() as u64);
        Ok(rows)
    }

    fn params_for(&self, source_name: &str) -> SourceParams {
        self.sources.get(source_name).cloned().unwrap_or_default()
    }
}
