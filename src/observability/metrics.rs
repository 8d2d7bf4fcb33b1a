//! Metrics for the ETL pipeline stages
//!
//! Provides a straightforward API for recording per-stage metrics using the
//! standard Prometheus naming conventions. Recording is a no-op until a
//! recorder is installed via [`init`].

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Call once per process.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| "metrics recorder already installed")?;
    Ok(())
}

/// Render the current metrics snapshot in Prometheus exposition format.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Extract Metrics
// ============================================================================

pub mod extract {
    /// Record rows fetched from a source
    pub fn rows_extracted(source: &str, count: u64) {
        ::metrics::counter!("etl_extract_rows_total", "source" => source.to_string())
            .increment(count);
    }

    /// Record a collaborator failure while extracting a source
    pub fn extraction_error(source: &str) {
        ::metrics::counter!("etl_extract_errors_total", "source" => source.to_string())
            .increment(1);
    }
}

// ============================================================================
// Transform Metrics
// ============================================================================

pub mod transform {
    /// Record duplicate rows dropped by a cleaning pass
    pub fn duplicates_removed(count: u64) {
        ::metrics::counter!("etl_transform_duplicates_removed_total").increment(count);
    }

    /// Record missing cells replaced with zero values
    pub fn cells_filled(count: u64) {
        ::metrics::counter!("etl_transform_cells_filled_total").increment(count);
    }

    /// Record that a table passed through the transformer
    pub fn batch_processed(batch_size: usize) {
        ::metrics::histogram!("etl_transform_batch_size").record(batch_size as f64);
        ::metrics::counter!("etl_transform_batches_total").increment(1);
    }
}

// ============================================================================
// Join Metrics
// ============================================================================

pub mod join {
    /// Record the size of a merged table
    pub fn rows_merged(count: u64) {
        ::metrics::counter!("etl_join_rows_merged_total").increment(count);
    }

    /// Record transactions that found no matching customer
    pub fn unmatched_transactions(count: u64) {
        ::metrics::counter!("etl_join_unmatched_transactions_total").increment(count);
    }
}

// ============================================================================
// Validate Metrics
// ============================================================================

pub mod validate {
    /// Record the count one validation rule reported for a table
    pub fn rule_count(rule: &str, count: usize) {
        ::metrics::counter!("etl_validate_rule_hits_total", "rule" => rule.to_string())
            .increment(count as u64);
    }
}

// ============================================================================
// Load Metrics
// ============================================================================

pub mod load {
    /// Record records presented to a destination
    pub fn records_presented(destination: &str, count: u64) {
        ::metrics::counter!("etl_load_records_total", "destination" => destination.to_string())
            .increment(count);
    }
}
