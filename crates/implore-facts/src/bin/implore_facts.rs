//! implore-facts CLI
//!
//! Reads chart files, ranks their facts, and writes the insights as JSON.

use std::path::PathBuf;

use clap::Parser;
use implore_facts::{process_files, FactConfig, TemplateTextConverter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "implore-facts", version, about = "Rank data facts for chart files")]
struct Args {
    /// Chart files (.json, .csv, .tsv)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of facts kept per chart
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FactConfig::load(path)?,
        None => FactConfig::default(),
    };
    if let Some(top_k) = args.top_k {
        config.ranking.top_k = top_k;
    }

    let results = process_files(&args.inputs, &config, &TemplateTextConverter::new());

    let json = serde_json::to_string_pretty(&results)?;
    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{}", json),
    }

    Ok(())
}
