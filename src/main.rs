use clap::{Parser, Subcommand, ValueEnum};
use loancalc::application::calculator::LoanCalculator;
use loancalc::config::AppConfig;
use loancalc::domain::loan::LoanRequest;
use loancalc::domain::ports::{LoanStoreBox, ScheduleCacheBox};
use loancalc::infrastructure::in_memory::{
    InMemoryLoanStore, InMemoryScheduleCache, NoopScheduleCache,
};
#[cfg(feature = "storage-rocksdb")]
use loancalc::infrastructure::rocksdb::RocksDBStore;
use loancalc::interfaces::csv::request_reader::LoanRequestReader;
use loancalc::interfaces::csv::schedule_writer::ScheduleWriter;
use loancalc::interfaces::csv::summary_writer::SummaryWriter;
use loancalc::interfaces::http::Server;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
#[cfg(not(feature = "storage-rocksdb"))]
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (optional). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate the payment schedule of a single loan
    Calculate {
        /// Principal amount
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,

        /// Annual interest rate in percent (5.5 means 5.5%)
        #[arg(long, allow_negative_numbers = true)]
        rate: Decimal,

        /// Term in months
        #[arg(long, allow_negative_numbers = true)]
        term: i32,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Calculate every loan in a CSV file (loanAmount,interestRate,term)
    Batch {
        /// Input loan requests CSV file
        input: PathBuf,
    },
    /// Serve the REST API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// The whole calculation as pretty-printed JSON
    Json,
    /// The payment schedule as CSV
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = Some(db_path);
    }

    match cli.command {
        Command::Calculate {
            amount,
            rate,
            term,
            format,
        } => {
            let calculator = build_calculator(&config)?;
            let calculation = calculator
                .calculate(&LoanRequest::new(amount, rate, term))
                .await?;

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&calculation).into_diagnostic()?;
                    println!("{json}");
                }
                OutputFormat::Csv => {
                    let stdout = io::stdout();
                    ScheduleWriter::new(stdout.lock()).write_schedule(&calculation)?;
                }
            }
        }
        Command::Batch { input } => {
            let calculator = build_calculator(&config)?;
            let file = File::open(input).into_diagnostic()?;
            let reader = LoanRequestReader::new(file);

            let stdout = io::stdout();
            let mut writer = SummaryWriter::new(stdout.lock());
            for request_result in reader.requests() {
                match request_result {
                    Ok(request) => match calculator.calculate(&request).await {
                        Ok(calculation) => writer.write_summary(&calculation)?,
                        Err(e) => eprintln!("Error processing loan request: {}", e),
                    },
                    Err(e) => eprintln!("Error reading loan request: {}", e),
                }
            }
            writer.flush()?;
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            info!("Loan calculator v{}", env!("CARGO_PKG_VERSION"));
            let calculator = Arc::new(build_calculator(&config)?);
            Server::new(config.server.clone(), calculator).start().await?;
        }
    }

    Ok(())
}

fn build_calculator(config: &AppConfig) -> Result<LoanCalculator> {
    let store: LoanStoreBox = match &config.storage.db_path {
        Some(db_path) => open_persistent_store(db_path)?,
        None => Box::new(InMemoryLoanStore::new()),
    };

    let cache: ScheduleCacheBox = if config.cache.enabled {
        Box::new(InMemoryScheduleCache::new())
    } else {
        info!("result cache disabled");
        Box::new(NoopScheduleCache)
    };

    Ok(LoanCalculator::new(store, cache))
}

#[cfg(feature = "storage-rocksdb")]
fn open_persistent_store(db_path: &Path) -> Result<LoanStoreBox> {
    info!(path = %db_path.display(), "opening RocksDB store");
    Ok(Box::new(RocksDBStore::open(db_path)?))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_persistent_store(_db_path: &Path) -> Result<LoanStoreBox> {
    warn!(
        "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
    );
    Ok(Box::new(InMemoryLoanStore::new()))
}
