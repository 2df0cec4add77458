//! Example: adjacency of a synthetic "onion" phantom.
//!
//! Builds a cubic volume of concentric spherical shells, each split into a
//! left and a right half with its own label, then scans it and prints the
//! adjacency list. Optionally writes a JSON summary.
//!
//! Run from the workspace root:
//!   cargo run -p label-adjacency --example phantom -- --help
//!   cargo run -p label-adjacency --example phantom -- --size 48 --shells 4

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use label_adjacency::{
    MemoryVolume, ScanConfig, SliceSource, WriteOptions, scan_volume, write_adjacency_list,
};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Scan a synthetic shell phantom for label adjacency")]
struct Args {
    /// Edge length of the cubic volume in voxels
    #[arg(long, default_value_t = 32)]
    size: usize,

    /// Number of concentric shells (each contributes two labels)
    #[arg(long, default_value_t = 3)]
    shells: usize,

    /// Also pair labels that only touch inside slice 0
    #[arg(long)]
    include_first_slice: bool,

    /// Split each slice across worker threads
    #[arg(long)]
    parallel: bool,

    /// Optional JSON summary path
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LabelDto {
    label: u16,
    neighbors: Vec<u16>,
}

#[derive(Serialize)]
struct Summary {
    size: usize,
    shells: usize,
    slices: usize,
    voxels_visited: usize,
    comparisons: usize,
    /// Wall-clock time of the scan, in milliseconds.
    elapsed_ms: f64,
    labels: Vec<LabelDto>,
}

// ── Phantom ───────────────────────────────────────────────────────────────────

fn shell_phantom(size: usize, shells: usize) -> Result<MemoryVolume<u16>> {
    let c = (size as f64 - 1.0) / 2.0;
    let outer = size as f64 / 2.0;
    let step = outer / shells as f64;

    let mut data = Vec::with_capacity(size * size * size);
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let (dx, dy, dz) = (x as f64 - c, y as f64 - c, z as f64 - c);
                let r = (dx * dx + dy * dy + dz * dz).sqrt();
                let label = if r >= outer {
                    0
                } else {
                    let shell = ((r / step) as usize).min(shells - 1);
                    let half = usize::from(dx >= 0.0);
                    1 + 2 * shell + half
                };
                data.push(u16::try_from(label).context("label exceeds u16")?);
            }
        }
    }

    MemoryVolume::from_vec(size, size, size, data).context("building phantom volume")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.size == 0 || args.shells == 0 {
        bail!("--size and --shells must be positive");
    }

    let mut volume = shell_phantom(args.size, args.shells)?;
    let dims = volume.dims();
    println!(
        "phantom: {}x{}x{} voxels, {} labels",
        dims.width,
        dims.height,
        dims.depth,
        2 * args.shells
    );

    let cfg = ScanConfig {
        include_first_slice: args.include_first_slice,
        parallel: args.parallel,
    };
    let t0 = Instant::now();
    let out = scan_volume(&mut volume, &cfg).context("scanning phantom")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    write_adjacency_list(&out.registry, std::io::stdout().lock(), &WriteOptions::default())
        .context("printing adjacency list")?;
    println!(
        "{} pairs in {elapsed_ms:.2} ms ({} comparisons)",
        out.registry.pair_count(),
        out.stats.comparisons
    );

    if let Some(path) = args.out {
        let summary = Summary {
            size: args.size,
            shells: args.shells,
            slices: out.stats.slices,
            voxels_visited: out.stats.voxels_visited,
            comparisons: out.stats.comparisons,
            elapsed_ms,
            labels: out
                .registry
                .iter()
                .map(|(label, set)| LabelDto {
                    label,
                    neighbors: set.iter().copied().collect(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
        std::fs::write(&path, json).with_context(|| format!("writing {path}"))?;
        println!("summary written to {path}");
    }

    Ok(())
}
