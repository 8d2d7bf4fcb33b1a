use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::app::ports::SourcePort;
use crate::config::SourceParams;
use crate::domain::{CustomerRecord, TransactionRecord};

const DEFAULT_CUSTOMER_ROWS: usize = 1000;
const DEFAULT_TRANSACTION_ROWS: usize = 5000;

/// Simulated source collaborator. Generates shape-conforming customer and
/// transaction rows instead of reaching a real database or API; the
/// `SourceParams` control row counts and the RNG seed so runs can be
/// reproduced.
pub struct SimulatedSource;

impl SimulatedSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

fn rng_for(params: &SourceParams) -> StdRng {
    match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[async_trait]
impl SourcePort for SimulatedSource {
    async fn fetch_customers(&self, params: &SourceParams) -> Result<Vec<CustomerRecord>, String> {
        let rows = params.rows.unwrap_or(DEFAULT_CUSTOMER_ROWS);
        let now = Utc::now();

        let customers: Vec<CustomerRecord> = (0..rows)
            .map(|i| CustomerRecord {
                customer_id: Some(i as i64),
                name: Some(format!("Customer {i}")),
                email: Some(format!("customer{i}@example.com")),
                created_at: Some(now - Duration::days(i as i64)),
                days_since_creation: None,
            })
            .collect();

        debug!("Simulated {} customer rows", customers.len());
        Ok(customers)
    }

    async fn fetch_transactions(
        &self,
        params: &SourceParams,
    ) -> Result<Vec<TransactionRecord>, String> {
        let rows = params.rows.unwrap_or(DEFAULT_TRANSACTION_ROWS);
        let pool = params.customer_pool.unwrap_or(DEFAULT_CUSTOMER_ROWS as i64);
        let now = Utc::now();
        let mut rng = rng_for(params);

        let transactions: Vec<TransactionRecord> = (0..rows)
            .map(|i| TransactionRecord {
                transaction_id: Some(i as i64),
                customer_id: Some(rng.gen_range(0..pool)),
                amount: Some(rng.gen_range(10.0..1000.0)),
                timestamp: Some(now - Duration::hours(i as i64)),
            })
            .collect();

        debug!("Simulated {} transaction rows", transactions.len());
        Ok(transactions)
    }
}
