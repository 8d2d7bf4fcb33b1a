use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::{CustomerRecord, TransactionRecord};

/// Anchored email shape: local part, "@", a domain with at least one dot and
/// an alphabetic TLD of two or more letters.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// Rule counts over a customer table. Counts only; pass/fail policy belongs
/// to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerCheckReport {
    pub null_customer_ids: usize,
    pub null_emails: usize,
    pub invalid_emails: usize,
    pub duplicate_customer_ids: usize,
}

/// Rule counts over a transaction table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionCheckReport {
    pub negative_amounts: usize,
    pub missing_timestamps: usize,
}

/// Independent rule checks over extracted or cleaned tables. Never fails,
/// never mutates its input, and renders no verdict.
#[derive(Debug, Default)]
pub struct DataValidator;

impl DataValidator {
    pub fn new() -> Self {
        Self
    }

    /// Count nulls in the key columns, emails failing the shape check, and
    /// rows that repeat an already-seen customer id (the first occurrence is
    /// not counted). A missing email counts as null, not as invalid.
    pub fn validate_customers(&self, rows: &[CustomerRecord]) -> CustomerCheckReport {
        let mut report = CustomerCheckReport::default();
        let mut seen_ids: HashSet<Option<i64>> = HashSet::with_capacity(rows.len());

        for row in rows {
            if row.customer_id.is_none() {
                report.null_customer_ids += 1;
            }
            match row.email.as_deref() {
                None => report.null_emails += 1,
                Some(email) if !EMAIL_SHAPE.is_match(email) => report.invalid_emails += 1,
                Some(_) => {}
            }
            // Null ids group together here, as in the null check above
            if !seen_ids.insert(row.customer_id) {
                report.duplicate_customer_ids += 1;
            }
        }

        report
    }

    /// Count negative amounts and missing timestamps.
    pub fn validate_transactions(&self, rows: &[TransactionRecord]) -> TransactionCheckReport {
        let mut report = TransactionCheckReport::default();

        for row in rows {
            if matches!(row.amount, Some(amount) if amount < 0.0) {
                report.negative_amounts += 1;
            }
            if row.timestamp.is_none() {
                report.missing_timestamps += 1;
            }
        }

        report
    }
}
