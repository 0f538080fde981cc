//! Key estimation command.

use super::common::{OctaveProgress, ctrlc_token, load_input};
use crate::config::CliConfig;
use cadenza_analysis::key::{NUM_KEYS, key_correlations, key_qtransform_config};
use cadenza_analysis::{Chromagram, QTransform};
use clap::Args;
use std::path::PathBuf;

/// Estimate the musical key.
#[derive(Args)]
pub struct KeyArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of candidate keys to list
    #[arg(long, default_value = "3")]
    pub top: usize,

    /// Tuning offset in fractions of a bin (estimated when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub tuning: Option<f64>,

    /// TOML configuration file; its hop, fmin, window and tuning are used
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the key command.
pub fn run(args: KeyArgs) -> anyhow::Result<()> {
    if !(1..=NUM_KEYS).contains(&args.top) {
        anyhow::bail!("--top must be between 1 and {NUM_KEYS}, got {}", args.top);
    }

    let file = CliConfig::load_or_default(args.config.as_deref())?.qtransform;
    let mut config = key_qtransform_config();
    config.hop_length = file.hop_length;
    config.fmin = file.fmin;
    config.window = file.window;
    config.tuning = args.tuning.or(file.tuning);

    let (samples, sample_rate) = load_input(&args.input)?;

    let token = ctrlc_token()?;
    let mut progress = OctaveProgress::new();
    let result = QTransform::new(config).process_with(&samples, sample_rate, &mut progress, &token);
    progress.finish();
    let chroma = Chromagram::from_qtransform(&result?, 12, 0.0)?;
    let keys = key_correlations(&chroma)?;

    if let Some(best) = keys.first() {
        println!("Key: {} (r = {:.3})", best.key, best.correlation);
    }
    println!("\n  {:>4}  {:<10}  {:>11}", "Rank", "Key", "Correlation");
    for (rank, candidate) in keys.iter().take(args.top).enumerate() {
        println!(
            "  {:>4}  {:<10}  {:>11.3}",
            rank + 1,
            candidate.key.to_string(),
            candidate.correlation
        );
    }

    Ok(())
}
