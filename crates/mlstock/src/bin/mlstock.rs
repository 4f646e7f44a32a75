//! Dataset preparation and model training CLI.
//!
//! Usage: `mlstock prepare [OPTIONS]` or `mlstock train [OPTIONS]`
//! Example: `mlstock train --data-dir data -s 20150101 -e 20220901 --train winloss`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mlstock::{
    dataset::{
        CsvDataSource, CsvFeatureStore, DEFAULT_MAX_MISSING_RATIO, Dataset, DatasetAssembler,
        PipelineConfig, load_from_file,
    },
    primitives::{
        TradeDate,
        columns::{BASELINE_INDEX_CODE, STOCK_IPO_YEARS},
    },
    train::{DEFAULT_FOLDS, TrainAction, TrainConfig, train},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mlstock")]
#[command(about = "Weekly stock factor dataset assembly and model training", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and persist the feature table
    Prepare(DataArgs),
    /// Train models on a fresh or preloaded feature table
    Train(TrainArgs),
}

#[derive(Args)]
struct DataArgs {
    /// First trade date kept (YYYYMMDD)
    #[arg(short, long, default_value = "20090101")]
    start_date: TradeDate,

    /// Last trade date loaded (YYYYMMDD)
    #[arg(short, long, default_value = "20220901")]
    end_date: TradeDate,

    /// Directory holding weekly.csv and index_weekly.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Benchmark index code in index_weekly.csv
    #[arg(long, default_value = BASELINE_INDEX_CODE)]
    index_code: String,

    /// Directory receiving the feature table
    #[arg(long, default_value = "data/features")]
    out_dir: PathBuf,

    /// Factor columns; every non-reserved column of weekly.csv when omitted
    #[arg(long, value_delimiter = ',')]
    factors: Vec<String>,

    /// Drop stocks whose worst factor is missing more often than this
    #[arg(long, default_value_t = DEFAULT_MAX_MISSING_RATIO)]
    max_missing_ratio: f64,

    /// Minimum years since listing, 0 disables the check
    #[arg(long, default_value_t = STOCK_IPO_YEARS)]
    listing_years: u32,
}

#[derive(Args)]
struct TrainArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Persisted feature table to train on instead of rebuilding it
    #[arg(short, long)]
    preload: Option<PathBuf>,

    /// Models to train
    #[arg(short, long, value_enum, default_value_t = Action::All)]
    train: Action,

    /// Observations before this date train, the rest test (YYYYMMDD)
    #[arg(long, default_value = "20190101")]
    split_date: TradeDate,

    /// Cross-validation folds of the penalty search
    #[arg(long, default_value_t = DEFAULT_FOLDS)]
    folds: usize,

    /// Directory receiving the model files
    #[arg(long, default_value = "model")]
    model_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    All,
    Pct,
    Winloss,
}

impl From<Action> for TrainAction {
    fn from(action: Action) -> Self {
        match action {
            Action::All => Self::All,
            Action::Pct => Self::Pct,
            Action::Winloss => Self::WinLoss,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match cli.command {
        Commands::Prepare(args) => {
            let dataset = prepare(&args)?;
            print_summary(&dataset);
        }
        Commands::Train(args) => {
            let dataset = match &args.preload {
                Some(path) => load_from_file(&CsvFeatureStore::new(&args.data.out_dir), path)?,
                None => prepare(&args.data)?,
            };

            let config = TrainConfig {
                split_date: args.split_date,
                folds: args.folds,
                output_dir: args.model_dir.clone(),
                ..TrainConfig::default()
            };
            for outcome in train(&dataset, args.train.into(), &config)? {
                println!(
                    "{:<8} alpha={:<8} {}  -> {}",
                    outcome.model.mode.to_string(),
                    outcome.model.alpha,
                    outcome.model.evaluation,
                    outcome.path.display()
                );
            }
        }
    }

    Ok(())
}

/// Build the feature table from the CSV inputs and persist it.
fn prepare(args: &DataArgs) -> Result<Dataset, Box<dyn std::error::Error>> {
    let source = CsvDataSource::new(&args.data_dir).with_index_code(args.index_code.as_str());
    let factors =
        if args.factors.is_empty() { source.factor_columns()? } else { args.factors.clone() };
    info!(factors = factors.len(), "factor columns: {}", factors.join(","));

    let config = PipelineConfig {
        max_missing_ratio: args.max_missing_ratio,
        min_listing_years: (args.listing_years > 0).then_some(args.listing_years),
        ..PipelineConfig::new(args.start_date, args.end_date, factors)
    };

    let assembler = DatasetAssembler::new(config)?;
    Ok(assembler.run(&source, &CsvFeatureStore::new(&args.out_dir))?)
}

fn print_summary(dataset: &Dataset) {
    println!("\nStage reports:");
    for report in dataset.reports() {
        println!("  {report}");
    }
    println!("\n{} rows, {} factors", dataset.len(), dataset.feature_names().len());
    if let Some(path) = dataset.path() {
        println!("Written to {}", path.display());
    }
}

fn setup_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();
}
