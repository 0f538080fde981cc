//! Chromagram command.

use super::common::{OctaveProgress, ctrlc_token, load_input};
use crate::config::CliConfig;
use cadenza_analysis::export::export_chroma_csv;
use cadenza_analysis::{Chromagram, QMode, QTransform};
use clap::Args;
use std::path::PathBuf;

/// Chromagram (pitch class profile) over time.
#[derive(Args)]
pub struct ChromaArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Lowest analysed frequency in Hz (default C1)
    #[arg(long)]
    pub fmin: Option<f64>,

    /// Number of octaves analysed
    #[arg(long, default_value = "7")]
    pub octaves: usize,

    /// Q-transform bins per octave; must be a multiple of --num-chroma
    #[arg(long, default_value = "12")]
    pub bins_per_octave: usize,

    /// Number of pitch classes
    #[arg(long, default_value = "12")]
    pub num_chroma: usize,

    /// Floor applied before per-frame normalization
    #[arg(long, default_value = "0.0")]
    pub threshold: f64,

    /// Tuning offset in fractions of a bin (estimated when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub tuning: Option<f64>,

    /// Length of each printed segment in seconds
    #[arg(long, default_value = "0.5")]
    pub segment: f64,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the chroma command.
pub fn run(args: ChromaArgs) -> anyhow::Result<()> {
    if args.num_chroma == 0 || args.bins_per_octave % args.num_chroma != 0 {
        anyhow::bail!(
            "--bins-per-octave {} must be a positive multiple of --num-chroma {}",
            args.bins_per_octave,
            args.num_chroma
        );
    }

    let mut config = CliConfig::load_or_default(args.config.as_deref())?.qtransform;
    config.mode = QMode::Constant;
    config.bins_per_octave = args.bins_per_octave;
    config.num_bins = args.octaves * args.bins_per_octave;
    if let Some(fmin) = args.fmin {
        config.fmin = fmin;
    }
    if args.tuning.is_some() {
        config.tuning = args.tuning;
    }

    let (samples, sample_rate) = load_input(&args.input)?;

    let token = ctrlc_token()?;
    let mut progress = OctaveProgress::new();
    let result = QTransform::new(config).process_with(&samples, sample_rate, &mut progress, &token);
    progress.finish();
    let chroma = Chromagram::from_qtransform(&result?, args.num_chroma, args.threshold)?;

    println!(
        "Chromagram: {} pitch classes x {} frames",
        chroma.num_chroma,
        chroma.num_frames()
    );
    print_segments(&chroma, args.segment);

    if let Some(output) = &args.output {
        export_chroma_csv(&chroma, output)?;
        println!("Output written to {}", output.display());
    }

    Ok(())
}

/// Print the most frequent dominant pitch class of each time segment.
fn print_segments(chroma: &Chromagram, segment_secs: f64) {
    let frame_secs = chroma.frame_to_time(1);
    let frames_per_segment = if frame_secs > 0.0 {
        ((segment_secs / frame_secs).round() as usize).max(1)
    } else {
        1
    };

    let label = |pc: usize| {
        if chroma.num_chroma == 12 {
            Chromagram::pitch_class_names()[pc].to_string()
        } else {
            pc.to_string()
        }
    };

    println!("\n  {:>8}  {:>5}", "Time (s)", "Pitch");
    for start in (0..chroma.num_frames()).step_by(frames_per_segment) {
        let end = (start + frames_per_segment).min(chroma.num_frames());
        let mut votes = vec![0usize; chroma.num_chroma];
        for frame in start..end {
            if let Some(pc) = chroma.dominant_pitch_class(frame) {
                votes[pc] += 1;
            }
        }
        let winner = votes
            .iter()
            .enumerate()
            .max_by_key(|&(i, &count)| (count, std::cmp::Reverse(i)))
            .map(|(i, _)| i);
        if let Some(pc) = winner {
            println!("  {:>8.2}  {:>5}", chroma.frame_to_time(start), label(pc));
        }
    }
}
