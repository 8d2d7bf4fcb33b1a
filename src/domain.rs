use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A customer row as extracted from the database source. Missing cells are
/// `None` until the transformer fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Derived by the transformer; absent on freshly extracted rows.
    #[serde(default)]
    pub days_since_creation: Option<i64>,
}

/// A transaction row as extracted from the API feed. `customer_id` is a
/// foreign key into the customer table and may be unmatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub amount: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// One row of the left-outer join output: the transaction plus the matching
/// customer, or `None` when no customer shares the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub transaction: TransactionRecord,
    pub customer: Option<CustomerRecord>,
}

/// Behavior the cleaning steps need from a tabular record type.
pub trait Record: Clone + Serialize {
    /// Stable textual identity over every cell, used for full-row duplicate
    /// removal.
    fn row_key(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replace missing cells with type-appropriate zero values, returning how
    /// many cells were filled. Lossy on purpose: a filled cell is
    /// indistinguishable from a genuine zero afterwards.
    fn fill_missing(&mut self) -> usize;

    /// Creation timestamp, for record types that carry one.
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Store the derived age column, for record types that carry one.
    fn set_days_since_creation(&mut self, _days: i64) {}
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Record for CustomerRecord {
    fn fill_missing(&mut self) -> usize {
        let mut filled = 0;
        if self.customer_id.is_none() {
            self.customer_id = Some(0);
            filled += 1;
        }
        if self.name.is_none() {
            self.name = Some(String::new());
            filled += 1;
        }
        if self.email.is_none() {
            self.email = Some(String::new());
            filled += 1;
        }
        if self.created_at.is_none() {
            self.created_at = Some(epoch());
            filled += 1;
        }
        filled
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_days_since_creation(&mut self, days: i64) {
        self.days_since_creation = Some(days);
    }
}

impl Record for TransactionRecord {
    fn fill_missing(&mut self) -> usize {
        let mut filled = 0;
        if self.transaction_id.is_none() {
            self.transaction_id = Some(0);
            filled += 1;
        }
        if self.customer_id.is_none() {
            self.customer_id = Some(0);
            filled += 1;
        }
        if self.amount.is_none() {
            self.amount = Some(0.0);
            filled += 1;
        }
        if self.timestamp.is_none() {
            self.timestamp = Some(epoch());
            filled += 1;
        }
        filled
    }
}
