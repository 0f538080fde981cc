//! STFT magnitude export command.

use super::common::load_input;
use crate::config::CliConfig;
use cadenza_analysis::export::export_stft_csv;
use cadenza_analysis::{StftAnalyzer, Window};
use clap::Args;
use std::path::PathBuf;

/// Short-time Fourier transform magnitudes.
#[derive(Args)]
pub struct StftArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// FFT size
    #[arg(long)]
    pub n_fft: Option<usize>,

    /// Hop length in samples
    #[arg(long)]
    pub hop: Option<usize>,

    /// Window function
    #[arg(long)]
    pub window: Option<Window>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output magnitudes in dB
    #[arg(long)]
    pub db: bool,
}

/// Run the stft command.
pub fn run(args: StftArgs) -> anyhow::Result<()> {
    let mut settings = CliConfig::load_or_default(args.config.as_deref())?.stft;
    if let Some(n_fft) = args.n_fft {
        settings.num_fft = n_fft;
    }
    if let Some(hop) = args.hop {
        settings.hop_length = hop;
    }
    if let Some(window) = args.window {
        settings.window = window;
    }

    let (samples, sample_rate) = load_input(&args.input)?;
    let analyzer = StftAnalyzer::new(settings.num_fft, settings.hop_length, &settings.window)?;
    let magnitudes = analyzer.magnitudes(&samples);

    println!(
        "STFT: {} bins x {} frames ({} window, n_fft {}, hop {})",
        analyzer.num_bins(),
        analyzer.num_frames(samples.len()),
        settings.window.name(),
        settings.num_fft,
        settings.hop_length
    );

    if let Some(output) = &args.output {
        export_stft_csv(
            &magnitudes,
            sample_rate,
            settings.num_fft,
            settings.hop_length,
            output,
            args.db,
        )?;
        println!("Output written to {}", output.display());
    }

    Ok(())
}
