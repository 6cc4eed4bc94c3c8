use clap::Parser;
use sentiserve_classifiers::Backend;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "sentiserve-server")]
#[command(author, version, about = "Sentiment classification HTTP server", long_about = None)]
pub struct Cli {
    /// Configuration file path (skipped when missing)
    #[arg(short, long, default_value = "sentiserve.yaml")]
    pub config: PathBuf,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "PORT")]
    pub port: Option<u16>,

    /// Classifier backend: candle or lexicon
    #[arg(short, long, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    /// Model cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse()
}
