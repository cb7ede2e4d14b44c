//! nbnorm - narrowband composite normalizer
//!
//! Rebalances Hα / SII / OIII composites, trims the background, removes
//! green casts and shapes the tones for display.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nb_core::{Mode, Palette};
use nb_ops::{BlackpointReference, LightnessMode, ScnrMethod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "nbnorm")]
#[command(author, version, about = "Normalize narrowband astronomical composites")]
#[command(long_about = "
Normalizes three-channel narrowband composites (Ha, SII, OIII mapped to RGB).

Stages, in order: channel booster, blackpoint clip, SCNR, optional L*a*b*
lightness replacement, highlight / gamma / brightness shaping, final clip.
Every option defaults to a no-op.

Examples:
  nbnorm process m16.tif m16_norm.tif --sii-boost 1.4 --scnr 1
  nbnorm process m16.tif out.tif --mode 0 --lightness 2 --blackpoint 0.1
  nbnorm process m16.tif out.tif --blackpoint 0.5 --blackpoint-ref median
  nbnorm process m16.tif out.tif --preset sho.yaml --brightness 1.2
  nbnorm process m16.tif out.tif --save-channels    # out_r.tif, out_g.tif, out_b.tif
  nbnorm stats m16.tif
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the normalization pipeline on a TIFF
    #[command(visible_alias = "p")]
    Process(ProcessArgs),

    /// Print image statistics
    #[command(visible_alias = "s")]
    Stats(StatsArgs),
}

/// Options of `nbnorm process`. Unset options keep the preset (or default) value.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input RGB TIFF
    pub input: PathBuf,

    /// Output TIFF (32-bit float)
    pub output: PathBuf,

    /// YAML preset supplying base parameters
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Data type: 0 = linear, 1 = non-linear [default: 1]
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Lightness: 0 = off, 1 = original, 2 = Ha, 3 = SII, 4 = OIII [default: 0]
    #[arg(long)]
    pub lightness: Option<LightnessMode>,

    /// SCNR: 0 = off, 1 = on [default: 0]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub scnr: Option<u8>,

    /// SCNR neutral level: average or maximum [default: maximum]
    #[arg(long)]
    pub scnr_method: Option<ScnrMethod>,

    /// Line to plane assignment: hso, hos, sho, soh, ohs, osh [default: hso]
    #[arg(long)]
    pub palette: Option<Palette>,

    /// Blackpoint fraction of the peak, 0 to 1 (1 = off) [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub blackpoint: Option<f64>,

    /// Blackpoint measured against: peak or median [default: peak]
    #[arg(long, alias = "blackpoint_ref")]
    pub blackpoint_ref: Option<BlackpointReference>,

    /// SII boost factor [default: 1]
    #[arg(long, alias = "sii_boost", allow_negative_numbers = true)]
    pub sii_boost: Option<f64>,

    /// OIII boost factor [default: 1]
    #[arg(long, alias = "oiii_boost", allow_negative_numbers = true)]
    pub oiii_boost: Option<f64>,

    /// Highlight recovery exponent [default: 1]
    #[arg(long, alias = "hl_recover", allow_negative_numbers = true)]
    pub hl_recover: Option<f64>,

    /// Highlight reduction factor [default: 1]
    #[arg(long, alias = "hl_reduction", allow_negative_numbers = true)]
    pub hl_reduction: Option<f64>,

    /// Brightness factor [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub brightness: Option<f64>,

    /// Write each plane to its own file (_r, _g, _b)
    #[arg(long, alias = "save_channels")]
    pub save_channels: bool,

    /// Print the effective parameters as YAML
    #[arg(long)]
    pub print_params: bool,

    /// Print input and output statistics
    #[arg(long)]
    pub stats: bool,
}

/// Options of `nbnorm stats`.
#[derive(Args)]
pub struct StatsArgs {
    /// Input RGB TIFF
    pub input: PathBuf,

    /// Print as YAML
    #[arg(long)]
    pub yaml: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Stats(args) => commands::stats::run(args),
    }
}
