//! hilocus-conserved - report conserved orthologs of a hiLocus table

use clap::Parser;
use hymhub_common::logging::{init_logging, LogConfig, LogLevel};
use hymhub_orthologs::{Cli, IsoformMap, OrthologSelector};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder().level(level).build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // Stdout carries the report; logging must not prevent it
    let guard = init_logging(&log_config).ok();

    if let Err(e) = run(&cli) {
        error!(error = %e, "hiLocus selection failed");
        drop(guard);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let species = cli.species_list();
    let mapping = IsoformMap::build(&cli.rootdir, &species)?;

    let (input, source): (Box<dyn Read>, String) = match cli.input_path() {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                anyhow::anyhow!("Failed to open hiLocus table {}: {}", path.display(), e)
            })?;
            (Box::new(BufReader::new(file)), path.display().to_string())
        },
        None => (Box::new(io::stdin().lock()), "<stdin>".to_string()),
    };

    let output = BufWriter::new(io::stdout().lock());
    OrthologSelector::new(&mapping, cli.copy_mode()).run(input, output, &source)?;
    Ok(())
}
