//! memfs CLI
//!
//! Interactive shell over an in-memory file store, plus a throughput bench.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use memfs_core::ports::StdoutSink;
use memfs_core::{MemFs, MemfsConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bench;
mod error;
mod parser;
mod repl;

use error::CliError;

/// memfs - in-memory file store with a worker pool for batch operations
#[derive(Parser)]
#[command(name = "memfs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker threads (overrides the config file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-entry size cap in bytes, overhead included
    #[arg(long)]
    pub max_entry_size: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// Time create/write/read/delete for each worker count
    Bench {
        /// Worker counts to run, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "1,2,4,8,16")]
        threads: Vec<usize>,

        /// Files per round
        #[arg(short = 'n', long, default_value_t = 10_000)]
        files: usize,

        /// Also write the results to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn load_config(&self) -> Result<MemfsConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => MemfsConfig::from_json_file(path)?,
            None => MemfsConfig::default(),
        };
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(max) = self.max_entry_size {
            config = config.with_max_entry_size(max);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins unless -v was given
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.load_config()?;
    info!(workers = config.workers, max_entry_size = config.max_entry_size, "config loaded");

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let fs = MemFs::builder()
                .config(config)
                .sink(Arc::new(StdoutSink))
                .build()
                .map_err(CliError::from)?;
            repl::run(Arc::new(fs)).await?;
        }
        Commands::Bench {
            threads,
            files,
            output,
        } => {
            let options = bench::BenchOptions {
                threads,
                files,
                config,
            };
            let results = tokio::task::spawn_blocking(move || bench::run(&options))
                .await
                .map_err(CliError::from)?
                .map_err(CliError::from)?;
            let text = bench::render(&results);
            print!("{text}");
            if let Some(path) = output {
                std::fs::write(&path, &text).map_err(CliError::from)?;
                println!("results written to {}", path.display());
            }
        }
    }
    Ok(())
}
