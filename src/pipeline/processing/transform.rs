use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::app::ports::Clock;
use crate::domain::Record;
use crate::error::Result;
use crate::infra::clock::SystemClock;
use crate::observability::metrics;

/// Cleans one extracted table: duplicate removal, null-fill, derived fields.
/// Generic over the record type so customer and transaction tables share the
/// same cleaning path.
pub struct Transformer {
    clock: Arc<dyn Clock>,
}

impl Transformer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Transformer wired to the ambient wall clock, for production runs.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Clean a table in three ordered steps: drop duplicate rows under
    /// full-row equality (first occurrence kept, relative order preserved),
    /// fill missing cells with zero values, and derive `days_since_creation`
    /// where the record type carries a creation timestamp. The age is
    /// computed against the injected clock.
    pub fn transform<R: Record>(&self, rows: Vec<R>) -> Result<Vec<R>> {
        let extracted = rows.len();
        let mut rows = drop_duplicate_rows(rows)?;
        let duplicates = extracted - rows.len();

        let mut filled = 0;
        for row in &mut rows {
            filled += row.fill_missing();
        }

        let now = self.clock.now();
        for row in &mut rows {
            if let Some(created) = row.created_at() {
                row.set_days_since_creation(whole_days_between(created, now));
            }
        }

        debug!(
            "Transformed {} rows ({} duplicates dropped, {} cells filled)",
            rows.len(),
            duplicates,
            filled
        );
        metrics::transform::duplicates_removed(duplicates as u64);
        metrics::transform::cells_filled(filled as u64);
        metrics::transform::batch_processed(rows.len());
        Ok(rows)
    }
}

/// Keep the first occurrence of each distinct row, preserving order.
fn drop_duplicate_rows<R: Record>(rows: Vec<R>) -> Result<Vec<R>> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.row_key()?) {
            unique.push(row);
        }
    }
    Ok(unique)
}

/// Whole days from `created` to `now`, floored so a future `created` counts
/// negative.
fn whole_days_between(created: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created).num_milliseconds().div_euclid(86_400_000)
}
