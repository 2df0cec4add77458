//! Writes the 6-connected adjacency list of a label volume.
//!
//! Run from the workspace root:
//!   cargo run -p la-tools --bin generate_adjacencies -- atlas.json
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-slice and
//! per-label detail.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use la_tools::{AtlasConfig, generate_adjacencies};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "generate_adjacencies")]
#[command(about = "Associate each label of a 3D label volume with the labels it touches")]
struct Cli {
    /// Atlas configuration file (JSON)
    config: PathBuf,

    /// Split each slice across worker threads
    #[arg(long)]
    parallel: bool,

    /// Also pair labels that only touch inside the first slice
    #[arg(long)]
    include_first_slice: bool,

    /// Largest label written to the adjacency file
    #[arg(long)]
    max_label: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut cfg = AtlasConfig::load(&cli.config)
        .with_context(|| format!("loading atlas config {}", cli.config.display()))?;
    cfg.parallel |= cli.parallel;
    cfg.include_first_slice |= cli.include_first_slice;
    if cli.max_label.is_some() {
        cfg.max_label = cli.max_label;
    }

    let summary = generate_adjacencies(&cfg).context("generating adjacencies")?;
    info!(
        "{} slices, {} labels with neighbors -> {}",
        summary.stats.slices,
        summary.write.lines,
        summary.output.display()
    );

    Ok(())
}
