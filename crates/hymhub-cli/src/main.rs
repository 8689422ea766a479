//! HymHub build driver - main entry point

use clap::Parser;
use hymhub_cli::{run_build, Cli, CliError};
use hymhub_common::logging::{init_logging, LogConfig, LogLevel};
use hymhub_ingest::IngestConfig;
use std::process;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Usage errors come before any file or network I/O
    let options = match cli.build_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            eprintln!("For more information, try '--help'.");
            process::exit(1);
        },
    };

    // Load .env if present
    let _ = dotenvy::dotenv();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Info };
    let log_config = LogConfig::builder()
        .level(level)
        .log_file(cli.logfile.clone())
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    let guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        },
    };

    if cli.num_procs != 1 {
        warn!(num_procs = cli.num_procs, "parallel processing not yet supported, running sequentially");
    }

    let result = async {
        let ingest = IngestConfig::from_env().map_err(CliError::Environment)?;
        let summary = run_build(&options, ingest).await?;
        anyhow::Ok(summary)
    }
    .await;

    match result {
        Ok(summary) => print!("{}", summary),
        Err(e) => {
            error!(error = %e, "Build failed");
            drop(guard);
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
