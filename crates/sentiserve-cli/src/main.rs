//! `sentiserve-predict <path_to_text_file>`
//!
//! Prints the classification of a text file as JSON. Exits with 1 on a
//! wrong argument count and on any failure.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use sentiserve_classifiers::ClassifierLoader;
use sentiserve_cli::{classify_file, Cli, CliConfig};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load()?;
    info!("Classifying {}", cli.path.display());

    let loader = ClassifierLoader::new(config.model);
    let result = classify_file(&loader, &cli.path).await?;

    println!("\n--- Classification Result ---");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Diagnostics go to stderr so stdout carries only the result
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiserve=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
