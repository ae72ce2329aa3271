//! filecopy CLI - copy one file with its mode bits
//!
//! Thin caller around the library primitives.

use clap::Parser;
use filecopy::config::{CliArgs, CopyOptions};
use filecopy::error::{CopyError, Result};
use filecopy::fs::FileCopier;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; -v raises the default level when RUST_LOG is unset
    let default_level = if args.verbose > 0 { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let options = CopyOptions::from_cli(&args).map_err(CopyError::config)?;
    let copier = FileCopier::new(options);

    let (dst, stats) = copier.copy_with_stats(&args.source, &args.destination, args.preserve)?;

    if args.verbose > 0 {
        println!(
            "{} -> {} ({}, {:?}, {:.2?}, {}/s)",
            args.source.display(),
            dst.display(),
            humansize::format_size(stats.bytes_copied, humansize::BINARY),
            stats.method,
            stats.duration,
            humansize::format_size(stats.throughput as u64, humansize::BINARY),
        );
    }

    Ok(())
}
