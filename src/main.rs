use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn};
use mjpeg_reframe::convert_file;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input MJPEG stream
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for length-prefixed records (created or truncated)
    #[arg(short, long)]
    output: PathBuf,

    /// "Convert only". Accepted for compatibility but has no effect;
    /// no behavior is known to have depended on it.
    #[arg(
        short = 'c',
        long = "convert-only",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    convert_only: bool,

    /// Log every frame
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("MJPEG reframer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "convert_only={} input={:?} output={:?}",
        args.convert_only, args.input, args.output
    );

    let stats = convert_file(&args.input, &args.output).with_context(|| {
        format!(
            "Failed to convert {:?} into {:?}",
            args.input, args.output
        )
    })?;

    stats.log_summary();

    if stats.frames_emitted == 0 {
        warn!("No frames written.");
    } else {
        info!("Records saved to: {:?}", args.output);
    }

    Ok(())
}
