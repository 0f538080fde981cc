//! Test tone generation command.

use cadenza_io::{WavSpec, write_wav};
use clap::Args;
use std::f64::consts::PI;
use std::path::PathBuf;

/// Generate a sum of sine tones.
#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Tone frequency in Hz; repeat for chords
    #[arg(long = "freq", default_value = "440.0", num_args = 1..)]
    pub freqs: Vec<f64>,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    pub duration: f64,

    /// Sample rate
    #[arg(long, default_value = "22050")]
    pub sample_rate: u32,

    /// Peak amplitude of the mix (0-1)
    #[arg(long, default_value = "0.8")]
    pub amplitude: f64,

    /// Bit depth (16, 24 or 32 float)
    #[arg(long, default_value = "32")]
    pub bits: u16,
}

/// Sum of equal-amplitude sines scaled so the mix never exceeds `amplitude`.
fn tone_mix(freqs: &[f64], sample_rate: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    let gain = amplitude / freqs.len().max(1) as f64;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            freqs.iter().map(|&f| (2.0 * PI * f * t).sin()).sum::<f64>() * gain
        })
        .collect()
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be positive");
    }
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("--duration must be a positive number of seconds");
    }
    let nyquist = f64::from(args.sample_rate) / 2.0;
    if let Some(&bad) = args.freqs.iter().find(|&&f| !(f > 0.0 && f < nyquist)) {
        anyhow::bail!("frequency {bad} Hz is outside (0, {nyquist}) Hz");
    }

    let sample_rate = f64::from(args.sample_rate);
    let num_samples = (args.duration * sample_rate) as usize;

    println!("Generating {} tone(s)...", args.freqs.len());
    println!(
        "  {:?} Hz for {:.2}s at {} Hz",
        args.freqs, args.duration, args.sample_rate
    );

    let samples = tone_mix(&args.freqs, sample_rate, num_samples, args.amplitude);
    let spec = WavSpec {
        channels: 1,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bits,
    };
    write_wav(&args.output, &samples, spec)?;
    println!("Wrote {} samples to {}", samples.len(), args.output.display());

    Ok(())
}
