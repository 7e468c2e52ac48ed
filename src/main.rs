use clap::Parser;
use genoma_core::{CustomerId, DEFAULT_TOP_K};
use genoma_engine::ScoringEngine;
use genoma_models::ModelSet;
use genoma_schema::RawRecord;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Batch customer scoring over pre-fitted models
#[derive(Parser, Debug)]
#[command(name = "genoma")]
#[command(about = "Score customer batches: segments, value, churn risk, similar customers", long_about = None)]
struct Args {
    /// JSON file with an array of raw customer rows
    input: PathBuf,

    /// Directory holding the model artifacts
    #[arg(short, long, default_value = "./models")]
    models: PathBuf,

    /// Write the CSV export here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the intelligence view for this customer id
    #[arg(long)]
    customer: Option<String>,

    /// Neighbors to include in the customer intelligence view
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Genoma v{}", env!("CARGO_PKG_VERSION"));
    info!("Model directory: {:?}", args.models);
    info!("Input batch: {:?}", args.input);

    let models = ModelSet::load_dir(&args.models)?;
    let engine = ScoringEngine::new(models);

    let contents = fs::read_to_string(&args.input)?;
    let batch: Vec<RawRecord> = serde_json::from_str(&contents)?;
    info!("Read {} raw rows", batch.len());

    let report = engine.score_raw(&batch)?;
    info!(
        "Report {}: {} scored, {} failed, {} degraded across {} clusters",
        report.report_id,
        report.overview.scored,
        report.overview.failed,
        report.overview.degraded,
        report.overview.distinct_clusters
    );

    if let Some(customer) = &args.customer {
        let customer_id = parse_customer_id(customer);
        let intel = report.customer_intelligence(&customer_id, args.top_k)?;
        println!("{}", serde_json::to_string_pretty(&intel)?);
    }

    let csv = report.to_csv_string();
    match &args.output {
        Some(path) => {
            fs::write(path, csv)?;
            info!("Wrote CSV export to {:?}", path);
        }
        None => print!("{}", csv),
    }

    Ok(())
}

/// Ids on the command line arrive as text; numeric ones collapse onto
/// integer identity the same way the normalizer does.
fn parse_customer_id(raw: &str) -> CustomerId {
    match raw.trim().parse::<u64>() {
        Ok(n) => CustomerId::Integer(n),
        Err(_) => CustomerId::String(raw.trim().to_string()),
    }
}
