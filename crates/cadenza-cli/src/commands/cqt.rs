//! Constant-Q and variable-Q transform commands.

use super::common::{OctaveProgress, ctrlc_token, extension, load_input, note_name};
use crate::config::CliConfig;
use cadenza_analysis::export::{export_qtransform_csv, export_qtransform_pgm};
use cadenza_analysis::{QMode, QTransform, QTransformConfig, QTransformResult, Window};
use clap::Args;
use std::path::{Path, PathBuf};

/// Options shared by `cqt` and `vqt`.
#[derive(Args)]
pub struct QTransformArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Hop length in samples
    #[arg(long)]
    pub hop: Option<usize>,

    /// Lowest bin frequency in Hz (default C1)
    #[arg(long)]
    pub fmin: Option<f64>,

    /// Total number of bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Bins per octave
    #[arg(long)]
    pub bins_per_octave: Option<usize>,

    /// Tuning offset in fractions of a bin (estimated when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub tuning: Option<f64>,

    /// Window function (hann, hamming, blackman, blackman-harris, ones)
    #[arg(long)]
    pub window: Option<Window>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file (.csv, .pgm or .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output magnitudes in dB (CSV and JSON)
    #[arg(long)]
    pub db: bool,

    /// Dynamic range of PGM images in dB
    #[arg(long, default_value = "80.0")]
    pub db_range: f64,

    /// Number of dominant bins to print
    #[arg(long, default_value = "5")]
    pub top: usize,
}

impl QTransformArgs {
    /// Settings from the config file with command-line overrides applied.
    fn resolve(&self) -> anyhow::Result<QTransformConfig> {
        let mut config = CliConfig::load_or_default(self.config.as_deref())?.qtransform;
        if let Some(hop) = self.hop {
            config.hop_length = hop;
        }
        if let Some(fmin) = self.fmin {
            config.fmin = fmin;
        }
        if let Some(bins) = self.bins {
            config.num_bins = bins;
        }
        if let Some(bpo) = self.bins_per_octave {
            config.bins_per_octave = bpo;
        }
        if self.tuning.is_some() {
            config.tuning = self.tuning;
        }
        if let Some(window) = self.window {
            config.window = window;
        }
        Ok(config)
    }
}

/// Constant-Q transform.
#[derive(Args)]
pub struct CqtArgs {
    #[command(flatten)]
    pub common: QTransformArgs,
}

/// Variable-Q transform.
#[derive(Args)]
pub struct VqtArgs {
    #[command(flatten)]
    pub common: QTransformArgs,

    /// Bandwidth offset in Hz (0 = auditory default; config value when omitted)
    #[arg(long)]
    pub gamma: Option<f64>,
}

/// Run the cqt command.
pub fn run_cqt(args: CqtArgs) -> anyhow::Result<()> {
    let mut config = args.common.resolve()?;
    config.mode = QMode::Constant;
    run(&args.common, config)
}

/// Run the vqt command.
pub fn run_vqt(args: VqtArgs) -> anyhow::Result<()> {
    let mut config = args.common.resolve()?;
    let gamma = match (args.gamma, config.mode) {
        (Some(gamma), _) => gamma,
        (None, QMode::Variable { gamma }) => gamma,
        (None, QMode::Constant) => 0.0,
    };
    config.mode = QMode::Variable { gamma };
    run(&args.common, config)
}

fn run(args: &QTransformArgs, config: QTransformConfig) -> anyhow::Result<()> {
    let (samples, sample_rate) = load_input(&args.input)?;

    let label = if config.mode.is_constant() { "CQT" } else { "VQT" };
    println!(
        "{}: {} bins from {:.2} Hz, {} per octave, hop {}",
        label, config.num_bins, config.fmin, config.bins_per_octave, config.hop_length
    );

    let token = ctrlc_token()?;
    let mut progress = OctaveProgress::new();
    let result = QTransform::new(config).process_with(&samples, sample_rate, &mut progress, &token);
    progress.finish();
    let result = result?;

    print_summary(&result, args.top);

    if let Some(output) = &args.output {
        write_output(&result, output, args.db, args.db_range)?;
        println!("Output written to {}", output.display());
    }

    Ok(())
}

fn print_summary(result: &QTransformResult, top: usize) {
    println!(
        "  {} bins x {} frames ({:.3}s per frame), tuning {:+.3} bins",
        result.num_bins(),
        result.num_frames(),
        result.frame_to_time(1),
        result.tuning
    );

    let mags = result.magnitudes();
    let frames = result.num_frames().max(1) as f64;
    let mut energy: Vec<(usize, f64)> = mags
        .iter()
        .enumerate()
        .map(|(bin, row)| (bin, row.iter().sum::<f64>() / frames))
        .collect();
    energy.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("\nDominant bins (mean magnitude):");
    println!("  {:>4}  {:>10}  {:>5}  {:>10}", "Bin", "Freq (Hz)", "Note", "Magnitude");
    for &(bin, mean) in energy.iter().take(top) {
        let freq = result.frequencies[bin];
        println!(
            "  {:>4}  {:>10.2}  {:>5}  {:>10.4}",
            bin,
            freq,
            note_name(freq),
            mean
        );
    }
}

fn write_output(
    result: &QTransformResult,
    path: &Path,
    db: bool,
    db_range: f64,
) -> anyhow::Result<()> {
    match extension(path).as_deref() {
        Some("pgm") => export_qtransform_pgm(result, path, db_range)?,
        Some("json") => {
            let magnitudes = if db {
                result.magnitude_db()
            } else {
                result.magnitudes()
            };
            let doc = serde_json::json!({
                "sample_rate": result.sample_rate,
                "hop_length": result.hop_length,
                "bins_per_octave": result.bins_per_octave,
                "tuning": result.tuning,
                "frequencies": result.frequencies,
                "db": db,
                "magnitudes": magnitudes,
            });
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            serde_json::to_writer(file, &doc)?;
        }
        _ => export_qtransform_csv(result, path, db)?,
    }
    Ok(())
}
