use std::collections::HashMap;

use tracing::debug;

use crate::domain::{CustomerRecord, MergedRecord, TransactionRecord};
use crate::observability::metrics;

/// Left-outer join of transactions against customers on `customer_id`.
///
/// Every transaction appears exactly once in the output; a transaction with
/// no matching customer keeps its own fields and carries `customer: None`.
/// Null keys never match. When several customers share an id (a data-quality
/// anomaly the validator reports separately), the first occurrence wins, so
/// the output row count always equals the transaction count.
pub fn left_outer_join(
    transactions: Vec<TransactionRecord>,
    customers: &[CustomerRecord],
) -> Vec<MergedRecord> {
    let mut by_id: HashMap<i64, &CustomerRecord> = HashMap::with_capacity(customers.len());
    for customer in customers {
        if let Some(id) = customer.customer_id {
            by_id.entry(id).or_insert(customer);
        }
    }

    let mut unmatched = 0u64;
    let merged: Vec<MergedRecord> = transactions
        .into_iter()
        .map(|transaction| {
            let customer = transaction
                .customer_id
                .and_then(|id| by_id.get(&id))
                .map(|customer| (*customer).clone());
            if customer.is_none() {
                unmatched += 1;
            }
            MergedRecord {
                transaction,
                customer,
            }
        })
        .collect();

    debug!(
        "Merged {} transactions ({} without a matching customer)",
        merged.len(),
        unmatched
    );
    metrics::join::rows_merged(merged.len() as u64);
    metrics::join::unmatched_transactions(unmatched);
    merged
}
