//! Tuning estimation
//!
//! Estimates how far a recording sits from A440 equal temperament, in
//! fractions of a bin (a semitone with the default 12 bins per octave).
//!
//! Spectral peaks are located with parabolic interpolation on STFT
//! magnitudes, the stronger half are kept, and each peak's offset from the
//! nearest equal-tempered pitch is histogrammed. The most common offset wins.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::tuning::estimate_tuning;
//!
//! let sr = 22050.0;
//! let tone: Vec<f64> = (0..22050)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sr).sin())
//!     .collect();
//! let tuning = estimate_tuning(&tone, sr).unwrap();
//! assert!(tuning.abs() < 0.05);
//! ```

use crate::error::{AnalysisError, Result};
use crate::frequency::{fft_freq_bins, hz_to_octaves};
use crate::stft::stft_magnitudes;
use crate::util::{find_local_maxima, histogram, median};
use crate::window::Window;
use serde::{Deserialize, Serialize};

/// Tuning estimator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// STFT size.
    pub num_fft: usize,
    /// STFT hop.
    pub hop_length: usize,
    /// STFT window.
    pub window: Window,
    /// Lowest FFT bin frequency considered for peaks (Hz).
    pub min_fft_freq: f64,
    /// FFT bin frequencies at or above this are ignored (Hz).
    pub max_fft_freq: f64,
    /// Resolution of the pitch grid.
    pub bins_per_octave: usize,
    /// Number of histogram bins over `[-0.5, 0.5]`.
    pub histogram_bins: usize,
    /// Peaks below this fraction of the frame maximum are ignored.
    pub peak_threshold: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            num_fft: 2048,
            hop_length: 512,
            window: Window::Hann,
            min_fft_freq: 150.0,
            max_fft_freq: 4000.0,
            bins_per_octave: 12,
            histogram_bins: 100,
            peak_threshold: 0.1,
        }
    }
}

/// Interpolated spectral peaks, `[bin][frame]`. Cells without a peak are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    /// Peak frequency (Hz).
    pub pitches: Vec<Vec<f64>>,
    /// Interpolated peak magnitude.
    pub magnitudes: Vec<Vec<f64>>,
}

impl PitchTrack {
    /// Iterate over `(pitch, magnitude)` of every detected peak.
    pub fn peaks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.pitches
            .iter()
            .zip(&self.magnitudes)
            .flat_map(|(p_row, m_row)| p_row.iter().copied().zip(m_row.iter().copied()))
            .filter(|&(p, _)| p > 0.0)
    }
}

/// Histogram-based tuning estimator.
#[derive(Debug, Clone, Default)]
pub struct TuningEstimator {
    config: TuningConfig,
}

impl TuningEstimator {
    /// Create an estimator with the given settings.
    pub fn new(config: TuningConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    /// Locate interpolated spectral peaks in every STFT frame.
    pub fn pitch_track(&self, samples: &[f64], sample_rate: f64) -> Result<PitchTrack> {
        let cfg = &self.config;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }

        let spec = stft_magnitudes(samples, cfg.num_fft, cfg.hop_length, &cfg.window)?;
        let num_bins = spec.len();
        let num_frames = spec.first().map_or(0, Vec::len);

        let upper = cfg.max_fft_freq.min(sample_rate / 2.0);
        let freq_ok: Vec<bool> = fft_freq_bins(cfg.num_fft, sample_rate)
            .into_iter()
            .map(|f| cfg.min_fft_freq <= f && f < upper)
            .collect();

        let mut pitches = vec![vec![0.0; num_frames]; num_bins];
        let mut magnitudes = vec![vec![0.0; num_frames]; num_bins];
        let bin_hz = sample_rate / cfg.num_fft as f64;
        let mut column = vec![0.0; num_bins];

        for t in 0..num_frames {
            let peak = (0..num_bins).map(|i| spec[i][t]).fold(0.0, f64::max);
            let reference = cfg.peak_threshold * peak;
            for (i, slot) in column.iter_mut().enumerate() {
                let s = spec[i][t];
                *slot = if s > reference { s } else { 0.0 };
            }

            for (i, is_max) in find_local_maxima(&column).into_iter().enumerate() {
                if !is_max || !freq_ok[i] {
                    continue;
                }
                let cur = spec[i][t];
                // No interpolation on the outermost bins
                let (avg, shift) = if i == 0 || i + 1 >= num_bins {
                    (0.0, 0.0)
                } else {
                    let (prev, next) = (spec[i - 1][t], spec[i + 1][t]);
                    let avg = 0.5 * (next - prev);
                    let denom = 2.0 * cur - prev - next;
                    (avg, if denom == 0.0 { avg } else { avg / denom })
                };

                pitches[i][t] = (i as f64 + shift) * bin_hz;
                magnitudes[i][t] = cur + 0.5 * avg * shift;
            }
        }

        Ok(PitchTrack {
            pitches,
            magnitudes,
        })
    }

    /// Estimate the tuning deviation in fractions of a bin.
    ///
    /// Only peaks above `min_freq` Hz count. Returns 0.0 when no peak survives.
    pub fn estimate(&self, samples: &[f64], sample_rate: f64, min_freq: f64) -> Result<f64> {
        let cfg = &self.config;
        if cfg.bins_per_octave == 0 {
            return Err(AnalysisError::InvalidBinsPerOctave);
        }
        if cfg.histogram_bins == 0 {
            return Err(AnalysisError::invalid_parameter(
                "histogram_bins",
                "must be positive",
            ));
        }

        let track = self.pitch_track(samples, sample_rate)?;
        let candidates: Vec<(f64, f64)> = track.peaks().filter(|&(p, _)| p > min_freq).collect();
        let mags: Vec<f64> = candidates.iter().map(|&(_, m)| m).collect();
        let threshold = median(&mags).unwrap_or(0.0);

        let bpo = cfg.bins_per_octave as f64;
        let residuals: Vec<f64> = candidates
            .iter()
            .filter(|&&(_, m)| m >= threshold)
            .map(|&(p, _)| {
                let r = (bpo * hz_to_octaves(p)).rem_euclid(1.0);
                if r >= 0.5 { r - 1.0 } else { r }
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            candidates = candidates.len(),
            kept = residuals.len(),
            threshold,
            "tuning peaks"
        );

        if residuals.is_empty() {
            return Ok(0.0);
        }

        let counts = histogram(&residuals, -0.5, 0.5, cfg.histogram_bins);
        let mut best = 0;
        for (i, &c) in counts.iter().enumerate() {
            if c > counts[best] {
                best = i;
            }
        }
        let width = 1.0 / cfg.histogram_bins as f64;
        Ok(-0.5 + (best as f64 + 0.5) * width)
    }
}

/// Estimate tuning with default settings and no minimum pitch.
pub fn estimate_tuning(samples: &[f64], sample_rate: f64) -> Result<f64> {
    TuningEstimator::default().estimate(samples, sample_rate, 0.0)
}
