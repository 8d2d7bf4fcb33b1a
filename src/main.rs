use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info, warn};

use customer_etl::config::Config;
use customer_etl::constants;
use customer_etl::error::PipelineError;
use customer_etl::infra::clock::SystemClock;
use customer_etl::infra::recording_sink::RecordingSink;
use customer_etl::infra::simulated_source::SimulatedSource;
use customer_etl::logging;
use customer_etl::observability;
use customer_etl::pipeline::extract::Extractor;
use customer_etl::pipeline::processing::transform::Transformer;
use customer_etl::pipeline::processing::validate::DataValidator;
use customer_etl::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "customer_etl")]
#[command(about = "Customer and transaction ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the pipeline configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract, transform, validate, join, load
    Run {
        /// Override the destination named in the config file
        #[arg(long)]
        destination: Option<String>,
    },
    /// Extract and clean both tables, then print the validation reports
    Validate,
    /// Extract a single source and report its shape. Available: database, api
    Extract {
        #[arg(long)]
        source: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    if std::env::var("ETL_METRICS").is_ok() {
        if let Err(e) = observability::metrics::init() {
            warn!("Failed to install metrics recorder: {}", e);
        }
    }

    let cli = Cli::parse();
    let mut config = Config::load_from(&cli.config)?;

    let source = Arc::new(SimulatedSource::new());
    let clock = Arc::new(SystemClock);

    match cli.command {
        Commands::Run { destination } => {
            if let Some(destination) = destination {
                config.pipeline.destination = destination;
            }

            println!("🚀 Running full ETL pipeline...");
            let sink = Arc::new(RecordingSink::new());
            let pipeline = Pipeline::new(source, sink, clock, &config);

            match pipeline.run().await {
                Ok(result) => {
                    println!("\n📊 Pipeline Results:");
                    println!("   Run id: {}", result.run_id);
                    println!(
                        "   Customers: {} extracted, {} after cleaning",
                        result.customers_extracted, result.customers_clean
                    );
                    println!(
                        "   Transactions: {} extracted, {} after cleaning",
                        result.transactions_extracted, result.transactions_clean
                    );
                    println!(
                        "   Merged: {} records presented to '{}'",
                        result.merged_records, result.destination
                    );
                    println!(
                        "   Customer checks: {}",
                        serde_json::to_string(&result.customer_report)?
                    );
                    println!(
                        "   Transaction checks: {}",
                        serde_json::to_string(&result.transaction_report)?
                    );
                    println!("✅ Run completed successfully");
                }
                Err(e) => {
                    error!("Pipeline run failed: {}", e);
                    println!("❌ Pipeline run failed: {}", e);
                }
            }
        }
        Commands::Validate => {
            println!("🔍 Validating cleaned tables...");
            let extractor = Extractor::new(source, config.sources.clone());
            let transformer = Transformer::new(clock);
            let validator = DataValidator::new();

            let customers = transformer.transform(extractor.extract_customers().await?)?;
            let transactions = transformer.transform(extractor.extract_transactions().await?)?;

            let customer_report = validator.validate_customers(&customers);
            let transaction_report = validator.validate_transactions(&transactions);

            println!(
                "📋 Customer checks ({} rows):\n{}",
                customers.len(),
                serde_json::to_string_pretty(&customer_report)?
            );
            println!(
                "📋 Transaction checks ({} rows):\n{}",
                transactions.len(),
                serde_json::to_string_pretty(&transaction_report)?
            );
        }
        Commands::Extract { source: name } => {
            let extractor = Extractor::new(source, config.sources.clone());
            match extractor.extract(&name).await {
                Ok(table) => {
                    info!("Extraction finished for '{}'", name);
                    println!("📥 Extracted {} rows from '{}'", table.len(), name);
                }
                Err(PipelineError::UnknownSource(name)) => {
                    warn!("Unknown source requested: {}", name);
                    println!(
                        "⚠️  Unknown source: {}. Available: {}",
                        name,
                        constants::supported_sources().join(", ")
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
