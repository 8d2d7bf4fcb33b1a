use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use customer_etl::app::ports::SourcePort;
use customer_etl::config::{Config, SourceParams};
use customer_etl::constants;
use customer_etl::domain::{CustomerRecord, TransactionRecord};
use customer_etl::infra::clock::FixedClock;
use customer_etl::infra::recording_sink::RecordingSink;
use customer_etl::infra::simulated_source::SimulatedSource;
use customer_etl::pipeline::extract::Extractor;
use customer_etl::pipeline::load::Loader;
use customer_etl::pipeline::processing::join::left_outer_join;
use customer_etl::pipeline::processing::transform::Transformer;
use customer_etl::pipeline::processing::validate::DataValidator;
use customer_etl::pipeline::Pipeline;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap()
}

fn simulated_config() -> Config {
    let mut config = Config::default();
    config.sources.insert(
        constants::DATABASE_SOURCE.to_string(),
        SourceParams {
            rows: Some(50),
            seed: Some(7),
            customer_pool: None,
        },
    );
    config.sources.insert(
        constants::API_SOURCE.to_string(),
        SourceParams {
            rows: Some(200),
            seed: Some(7),
            customer_pool: Some(50),
        },
    );
    config
}

#[tokio::test]
async fn full_run_over_simulated_sources() -> Result<()> {
    let config = simulated_config();
    let sink = Arc::new(RecordingSink::new());
    let pipeline = Pipeline::new(
        Arc::new(SimulatedSource::new()),
        sink.clone(),
        Arc::new(FixedClock(Utc::now())),
        &config,
    );

    let result = pipeline.run().await?;

    // Simulated rows are all distinct and fully populated
    assert_eq!(result.customers_extracted, 50);
    assert_eq!(result.customers_clean, 50);
    assert_eq!(result.transactions_extracted, 200);
    assert_eq!(result.transactions_clean, 200);

    // Left-outer semantics: one merged row per transaction
    assert_eq!(result.merged_records, 200);

    // Clean simulated data trips no validation rule
    assert_eq!(result.customer_report.null_customer_ids, 0);
    assert_eq!(result.customer_report.null_emails, 0);
    assert_eq!(result.customer_report.invalid_emails, 0);
    assert_eq!(result.customer_report.duplicate_customer_ids, 0);
    assert_eq!(result.transaction_report.negative_amounts, 0);
    assert_eq!(result.transaction_report.missing_timestamps, 0);

    // The sink observed exactly one hand-off
    let observations = sink.observations();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].destination, constants::DEFAULT_DESTINATION);
    assert_eq!(observations[0].records, 200);
    assert_eq!(result.receipt.records_presented, 200);

    Ok(())
}

/// Source collaborator yielding hand-built dirty tables: an exact duplicate
/// customer, missing cells, malformed emails, a negative amount, a missing
/// timestamp and a transaction with no matching customer.
struct DirtySource;

#[async_trait]
impl SourcePort for DirtySource {
    async fn fetch_customers(&self, _params: &SourceParams) -> Result<Vec<CustomerRecord>, String> {
        let alice = CustomerRecord {
            customer_id: Some(1),
            name: Some("Alice".to_string()),
            email: Some("alice@x.com".to_string()),
            created_at: Some(fixed_now() - Duration::days(10)),
            days_since_creation: None,
        };
        Ok(vec![
            alice.clone(),
            alice,
            CustomerRecord {
                customer_id: None,
                name: None,
                email: Some("not-an-email".to_string()),
                created_at: None,
                days_since_creation: None,
            },
            CustomerRecord {
                customer_id: Some(2),
                name: Some("Bob".to_string()),
                email: Some("x@y".to_string()),
                created_at: Some(fixed_now() - Duration::days(3)),
                days_since_creation: None,
            },
        ])
    }

    async fn fetch_transactions(
        &self,
        _params: &SourceParams,
    ) -> Result<Vec<TransactionRecord>, String> {
        Ok(vec![
            TransactionRecord {
                transaction_id: Some(10),
                customer_id: Some(1),
                amount: Some(-5.0),
                timestamp: Some(fixed_now() - Duration::hours(1)),
            },
            TransactionRecord {
                transaction_id: Some(11),
                customer_id: Some(999),
                amount: Some(20.0),
                timestamp: Some(fixed_now() - Duration::hours(2)),
            },
            TransactionRecord {
                transaction_id: Some(12),
                customer_id: Some(1),
                amount: Some(30.0),
                timestamp: None,
            },
        ])
    }
}

#[tokio::test]
async fn dirty_tables_are_cleaned_counted_and_loaded() -> Result<()> {
    let config = Config::default();
    let sink = Arc::new(RecordingSink::new());
    let pipeline = Pipeline::new(
        Arc::new(DirtySource),
        sink.clone(),
        Arc::new(FixedClock(fixed_now())),
        &config,
    );

    let result = pipeline.run().await?;

    // The exact duplicate collapses; nothing else does
    assert_eq!(result.customers_extracted, 4);
    assert_eq!(result.customers_clean, 3);
    assert_eq!(result.transactions_extracted, 3);
    assert_eq!(result.transactions_clean, 3);
    assert_eq!(result.merged_records, 3);

    // Validation ran on the cleaned tables: nulls were already filled, so
    // only shape and business rules fire
    assert_eq!(result.customer_report.null_customer_ids, 0);
    assert_eq!(result.customer_report.null_emails, 0);
    assert_eq!(result.customer_report.invalid_emails, 2);
    assert_eq!(result.customer_report.duplicate_customer_ids, 0);
    assert_eq!(result.transaction_report.negative_amounts, 1);
    assert_eq!(result.transaction_report.missing_timestamps, 0);

    let observations = sink.observations();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].records, 3);

    Ok(())
}

#[tokio::test]
async fn stage_by_stage_run_preserves_join_and_derivation_semantics() -> Result<()> {
    let extractor = Extractor::new(Arc::new(DirtySource), Default::default());
    let transformer = Transformer::new(Arc::new(FixedClock(fixed_now())));
    let validator = DataValidator::new();

    let customers = transformer.transform(extractor.extract_customers().await?)?;
    let transactions = transformer.transform(extractor.extract_transactions().await?)?;

    // Derived ages are exact under the fixed clock
    let alice = customers
        .iter()
        .find(|c| c.customer_id == Some(1))
        .expect("Alice survives cleaning");
    assert_eq!(alice.days_since_creation, Some(10));
    let bob = customers
        .iter()
        .find(|c| c.customer_id == Some(2))
        .expect("Bob survives cleaning");
    assert_eq!(bob.days_since_creation, Some(3));

    // Validating before the join sees the same tables the join consumes
    let report = validator.validate_customers(&customers);
    assert_eq!(report.invalid_emails, 2);

    let merged = left_outer_join(transactions, &customers);
    assert_eq!(merged.len(), 3);

    // The unmatched transaction keeps its fields and carries no customer
    let orphan = merged
        .iter()
        .find(|m| m.transaction.transaction_id == Some(11))
        .expect("orphan transaction is present");
    assert!(orphan.customer.is_none());
    assert_eq!(orphan.transaction.amount, Some(20.0));

    // Matched transactions carry the joined customer fields
    let matched = merged
        .iter()
        .find(|m| m.transaction.transaction_id == Some(10))
        .expect("matched transaction is present");
    assert_eq!(
        matched.customer.as_ref().and_then(|c| c.name.as_deref()),
        Some("Alice")
    );

    let sink = Arc::new(RecordingSink::new());
    let receipt = Loader::new(sink.clone())
        .load(&merged, "data_warehouse")
        .await?;
    assert_eq!(receipt.records_presented, 3);
    assert_eq!(sink.observations()[0].records, 3);

    Ok(())
}
