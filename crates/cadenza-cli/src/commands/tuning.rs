//! Tuning estimation command.

use super::common::load_input;
use crate::config::CliConfig;
use cadenza_analysis::TuningEstimator;
use clap::Args;
use std::path::PathBuf;

/// Estimate tuning deviation from A440.
#[derive(Args)]
pub struct TuningArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Ignore spectral peaks at or below this frequency (Hz)
    #[arg(long, default_value = "0.0")]
    pub min_freq: f64,

    /// Resolution of the pitch grid in bins per octave
    #[arg(long)]
    pub bins_per_octave: Option<usize>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the tuning command.
pub fn run(args: TuningArgs) -> anyhow::Result<()> {
    let mut config = CliConfig::load_or_default(args.config.as_deref())?.tuning;
    if let Some(bpo) = args.bins_per_octave {
        config.bins_per_octave = bpo;
    }
    let bpo = config.bins_per_octave;

    let (samples, sample_rate) = load_input(&args.input)?;
    let estimator = TuningEstimator::new(config);
    let tuning = estimator.estimate(&samples, sample_rate, args.min_freq)?;

    let cents = tuning * 1200.0 / bpo as f64;
    println!("Tuning: {tuning:+.3} bins ({cents:+.1} cents)");
    println!("Reference A4: {:.2} Hz", 440.0 * 2f64.powf(cents / 1200.0));

    Ok(())
}
