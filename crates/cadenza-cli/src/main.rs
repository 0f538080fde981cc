//! Cadenza CLI - Constant-Q and variable-Q analysis of audio files.

mod commands;
mod config;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadenza")]
#[command(author, version, about = "Cadenza audio analysis CLI", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Constant-Q transform of an audio file
    Cqt(commands::cqt::CqtArgs),

    /// Variable-Q transform of an audio file
    Vqt(commands::cqt::VqtArgs),

    /// Estimate tuning deviation from A440
    Tuning(commands::tuning::TuningArgs),

    /// Short-time Fourier transform magnitudes
    Stft(commands::stft::StftArgs),

    /// Chromagram (pitch class profile) over time
    Chroma(commands::chroma::ChromaArgs),

    /// Estimate the musical key
    Key(commands::key::KeyArgs),

    /// Generate test tones
    Generate(commands::generate::GenerateArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Cqt(args) => commands::cqt::run_cqt(args),
        Commands::Vqt(args) => commands::cqt::run_vqt(args),
        Commands::Tuning(args) => commands::tuning::run(args),
        Commands::Stft(args) => commands::stft::run(args),
        Commands::Chroma(args) => commands::chroma::run(args),
        Commands::Key(args) => commands::key::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
