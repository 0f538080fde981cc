//! Shared CLI helpers used across multiple commands.

use cadenza_analysis::{CancellationToken, ProgressSink, hz_to_midi};
use cadenza_io::read_wav;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Load a WAV file as mono samples and print a one-line summary.
pub fn load_input(path: &Path) -> anyhow::Result<(Vec<f64>, f64)> {
    let (samples, spec) = read_wav(path)?;
    let sample_rate = f64::from(spec.sample_rate);
    println!(
        "Loaded {}: {} samples, {} Hz, {:.2}s",
        path.display(),
        samples.len(),
        spec.sample_rate,
        samples.len() as f64 / sample_rate
    );
    Ok((samples, sample_rate))
}

/// Progress bar fed one tick per completed octave.
#[derive(Default)]
pub struct OctaveProgress {
    bar: Option<ProgressBar>,
}

impl OctaveProgress {
    /// Create a hidden bar; it is sized on the first report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish and clear the bar if one was shown.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }
}

impl ProgressSink for OctaveProgress {
    fn report(&mut self, done: usize, total: usize) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} octaves ({eta})")
            {
                bar.set_style(style.progress_chars("##-"));
            }
            bar
        });
        bar.set_position(done as u64);
    }
}

/// Cancellation token wired to Ctrl+C.
pub fn ctrlc_token() -> anyhow::Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling...");
        handler_token.cancel();
    })?;
    Ok(token)
}

/// Scientific pitch name of the nearest equal-tempered note, e.g. `A4`.
pub fn note_name(freq: f64) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    if !(freq.is_finite() && freq > 0.0) {
        return "-".to_string();
    }
    let midi = hz_to_midi(freq).round() as i64;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", NAMES[midi.rem_euclid(12) as usize], octave)
}

/// Lower-cased extension of `path`, if any.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(440.0), "A4");
        assert_eq!(note_name(261.63), "C4");
        assert_eq!(note_name(32.703), "C1");
        assert_eq!(note_name(27.5), "A0");
        assert_eq!(note_name(0.0), "-");
    }

    #[test]
    fn test_progress_sink_without_terminal() {
        let mut progress = OctaveProgress::new();
        progress.report(1, 7);
        progress.report(7, 7);
        progress.finish();
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension(Path::new("out.CSV")).as_deref(), Some("csv"));
        assert_eq!(extension(Path::new("out")), None);
    }
}
