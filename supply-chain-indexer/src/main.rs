use std::env;
use std::error::Error;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use supply_chain_indexer::{load_config, Dependencies, IndexingError};

#[derive(Parser)]
#[command(name = "supply-chain-indexer")]
#[command(about = "Copies the supply_chain table from PostgreSQL into the search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot the source table into the raw CSV file
    Extract,
    /// Clean the raw snapshot into the clean CSV file
    Clean,
    /// Index every row of the clean snapshot
    Load,
    /// Run the whole task chain with retries
    Run,
    /// Print the DAG definition and its next trigger time
    Schedule,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {}", err);
            source = err.source();
        }

        std::process::exit(1);
    }
}

/// Log to stdout, as JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run(command: Commands) -> Result<(), IndexingError> {
    let deps = Dependencies::new(load_config()?);

    match command {
        Commands::Extract => {
            deps.extractor()?.run().await?;
        }
        Commands::Clean => {
            deps.cleaner().run()?;
        }
        Commands::Load => {
            let summary = deps.loader()?.run().await?;
            info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Load finished"
            );
        }
        Commands::Run => {
            let report = deps.orchestrator()?.run().await?;
            for task in &report.tasks {
                info!(task_id = %task.task_id, attempts = task.attempts, "Task finished");
            }
        }
        Commands::Schedule => {
            let dag = deps.dag()?;
            println!("{}", dag);
            println!(
                "next_run: {}",
                dag.next_run_after(Utc::now()).to_rfc3339()
            );
        }
    }

    Ok(())
}
