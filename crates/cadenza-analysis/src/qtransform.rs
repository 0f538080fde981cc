//! Constant-Q and variable-Q transforms
//!
//! Computes a log-frequency spectrogram one octave at a time, top octave
//! first. Each octave multiplies a short STFT of the signal by the FFT of
//! that octave's wavelet filters, then halves the signal rate so the next
//! (lower) octave can reuse the same FFT size. A variable-Q transform adds
//! a bandwidth offset that shortens low-frequency filters, trading
//! frequency resolution for time resolution in the bass.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::qtransform::{QTransformConfig, cqt};
//!
//! let sr = 22050.0;
//! let tone: Vec<f64> = (0..22050)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / sr).sin())
//!     .collect();
//!
//! let config = QTransformConfig {
//!     tuning: Some(0.0),
//!     ..Default::default()
//! };
//! let result = cqt(&tone, sr, &config).unwrap();
//! assert_eq!(result.num_bins(), 84);
//! // C1 + 45 semitones = A4
//! assert_eq!(result.peak_bin(result.num_frames() / 2), Some(45));
//! ```

use crate::complex::ComplexMatrix;
use crate::error::{AnalysisError, Result};
use crate::fft::{fft, magnitude_db};
use crate::frequency::{compute_alpha, num_two_factors, qtransform_freq_bins};
use crate::progress::{CancellationToken, NoProgress, ProgressSink};
use crate::resample::{ResampleQuality, Resampler, SincResampler};
use crate::stft::stft;
use crate::tuning::estimate_tuning;
use crate::util::{Norm, matmul};
use crate::wavelet::{
    FilterBankParams, QMode, WaveletBasis, WaveletLengths, wavelet_basis, wavelet_lengths,
};
use crate::window::{Window, WindowFunction};
use serde::{Deserialize, Serialize};

/// Fraction of Nyquist below which the cheap resampling filter is accurate.
const FAST_FILTER_LIMIT: f64 = 0.85;

/// Q-transform settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QTransformConfig {
    /// Hop between frames at the input sample rate.
    pub hop_length: usize,
    /// Center frequency of the lowest bin before tuning (Hz).
    pub fmin: f64,
    /// Total number of bins; must be a whole number of octaves.
    pub num_bins: usize,
    /// Bins per octave.
    pub bins_per_octave: usize,
    /// Tuning offset in fractions of a bin. `None` estimates it from the signal.
    pub tuning: Option<f64>,
    /// Window applied to every wavelet filter.
    pub window: Window,
    /// Constant- or variable-Q bandwidths.
    pub mode: QMode,
}

impl Default for QTransformConfig {
    fn default() -> Self {
        Self {
            hop_length: 512,
            // C1
            fmin: 32.70319566257483,
            num_bins: 84,
            bins_per_octave: 12,
            tuning: None,
            window: Window::Hann,
            mode: QMode::Constant,
        }
    }
}

/// Q-transform output.
#[derive(Debug, Clone, PartialEq)]
pub struct QTransformResult {
    /// Complex responses `[bin][frame]`; row 0 is the lowest bin.
    pub data: ComplexMatrix,
    /// Center frequency of each bin after tuning (Hz).
    pub frequencies: Vec<f64>,
    /// Input sample rate (Hz).
    pub sample_rate: f64,
    /// Hop between frames at the input sample rate.
    pub hop_length: usize,
    /// Bins per octave.
    pub bins_per_octave: usize,
    /// Tuning offset that was applied, in fractions of a bin.
    pub tuning: f64,
}

impl QTransformResult {
    /// Number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.data.len()
    }

    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Magnitudes `[bin][frame]`.
    pub fn magnitudes(&self) -> Vec<Vec<f64>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Magnitudes in dB, `[bin][frame]`.
    pub fn magnitude_db(&self) -> Vec<Vec<f64>> {
        self.data.iter().map(|row| magnitude_db(row)).collect()
    }

    /// Center time of a frame in seconds.
    pub fn frame_to_time(&self, frame: usize) -> f64 {
        frame as f64 * self.hop_length as f64 / self.sample_rate
    }

    /// Center frequency of a bin, or `None` past the last bin.
    pub fn bin_to_freq(&self, bin: usize) -> Option<f64> {
        self.frequencies.get(bin).copied()
    }

    /// MIDI note number of each bin (A4 = 69), fractional when tuned.
    pub fn midi_notes(&self) -> Vec<f64> {
        self.frequencies
            .iter()
            .map(|&f| crate::frequency::hz_to_midi(f))
            .collect()
    }

    /// Loudest bin in a frame.
    pub fn peak_bin(&self, frame: usize) -> Option<usize> {
        if frame >= self.num_frames() {
            return None;
        }
        self.data
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a[frame].norm().total_cmp(&b[frame].norm()))
            .map(|(i, _)| i)
    }

    /// Center frequency of the loudest bin in a frame.
    pub fn peak_frequency(&self, frame: usize) -> Option<f64> {
        self.peak_bin(frame).and_then(|b| self.bin_to_freq(b))
    }
}

/// Octave-wise Q-transform driver.
#[derive(Debug, Clone)]
pub struct QTransform<R: Resampler = SincResampler> {
    config: QTransformConfig,
    resampler: R,
}

impl QTransform<SincResampler> {
    /// Create a transform using the built-in sinc resampler.
    pub fn new(config: QTransformConfig) -> Self {
        Self::with_resampler(config, SincResampler)
    }
}

impl<R: Resampler> QTransform<R> {
    /// Create a transform with a custom resampler.
    pub fn with_resampler(config: QTransformConfig, resampler: R) -> Self {
        Self { config, resampler }
    }

    /// Current settings.
    pub fn config(&self) -> &QTransformConfig {
        &self.config
    }

    /// Resampler used for decimation between octaves.
    pub fn resampler(&self) -> &R {
        &self.resampler
    }

    /// Run the transform without progress reporting.
    pub fn process(&self, samples: &[f64], sample_rate: f64) -> Result<QTransformResult> {
        self.process_with(
            samples,
            sample_rate,
            &mut NoProgress,
            &CancellationToken::new(),
        )
    }

    fn validate(&self, sample_rate: f64) -> Result<()> {
        let cfg = &self.config;
        if cfg.num_bins == 0 {
            return Err(AnalysisError::InvalidBinCount);
        }
        if cfg.bins_per_octave == 0 {
            return Err(AnalysisError::InvalidBinsPerOctave);
        }
        if cfg.num_bins % cfg.bins_per_octave != 0 {
            return Err(AnalysisError::BinsNotOctaveMultiple {
                num_bins: cfg.num_bins,
                bins_per_octave: cfg.bins_per_octave,
            });
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        if cfg.hop_length == 0 {
            return Err(AnalysisError::invalid_parameter(
                "hop_length",
                "must be positive",
            ));
        }
        if !(cfg.fmin.is_finite() && cfg.fmin > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "fmin",
                format!("must be a positive frequency, got {}", cfg.fmin),
            ));
        }
        if cfg.tuning.is_some_and(|t| !t.is_finite()) {
            return Err(AnalysisError::invalid_parameter("tuning", "must be finite"));
        }
        Ok(())
    }

    /// Run the transform, reporting after every octave and stopping early
    /// once `cancel` is triggered.
    pub fn process_with(
        &self,
        samples: &[f64],
        sample_rate: f64,
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<QTransformResult> {
        self.validate(sample_rate)?;
        let cfg = &self.config;
        let num_bins = cfg.num_bins;
        let bpo = cfg.bins_per_octave;

        let tuning = match cfg.tuning {
            Some(t) => t,
            None => estimate_tuning(samples, sample_rate)?,
        };
        let fmin = cfg.fmin * 2f64.powf(tuning / bpo as f64);

        let num_octaves = num_bins.div_ceil(bpo);
        let freqs = qtransform_freq_bins(num_bins, bpo, fmin);
        let params = FilterBankParams {
            filter_scale: 1.0,
            mode: cfg.mode,
            fallback_alpha: compute_alpha(bpo as f64),
        };

        let nyquist = sample_rate / 2.0;
        let WaveletLengths { cutoff, .. } =
            wavelet_lengths(&freqs, sample_rate, &cfg.window, &params);
        if cutoff > nyquist {
            return Err(AnalysisError::NyquistExceeded {
                max_frequency: freqs[num_bins - 1],
                nyquist,
            });
        }

        let mut quality = if cutoff < FAST_FILTER_LIMIT * nyquist {
            ResampleQuality::Fast
        } else {
            ResampleQuality::Best
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(tuning, fmin, cutoff, ?quality, num_octaves, "q-transform setup");

        let mut y = samples.to_vec();
        let mut sr = sample_rate;
        let mut hop = cfg.hop_length;

        if quality == ResampleQuality::Fast {
            let headroom = ((FAST_FILTER_LIMIT * nyquist / cutoff).log2().ceil() - 2.0).max(0.0);
            let hop_factors =
                (i64::from(num_two_factors(hop)) - num_octaves as i64 + 1).max(0) as u32;
            let count = (headroom as u32).min(hop_factors);

            if count > 0 {
                let factor = 1usize << count;
                if y.len() < factor {
                    return Err(AnalysisError::SignalTooShort {
                        len: y.len(),
                        num_octaves,
                    });
                }
                hop /= factor;
                let new_sr = sr / factor as f64;
                y = self
                    .resampler
                    .resample(&y, sr, new_sr, ResampleQuality::Fast, true)?;
                sr = new_sr;

                #[cfg(feature = "tracing")]
                tracing::debug!(factor, sr, hop, "early downsampling");
            }
        }

        let reference_sr = sr;
        let mut responses: Vec<ComplexMatrix> = Vec::with_capacity(num_octaves);
        let mut first_octave = 0;

        if quality == ResampleQuality::Best {
            // Top octave runs at full rate before the cheap filter takes over
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled {
                    completed: 0,
                    total: num_octaves,
                });
            }
            let top = &freqs[num_bins - bpo..];
            responses.push(self.octave_response(&y, sr, reference_sr, hop, top, &params)?);
            progress.report(1, num_octaves);
            first_octave = 1;
            quality = ResampleQuality::Fast;
        }

        for octave in first_octave..num_octaves {
            if cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled {
                    completed: octave,
                    total: num_octaves,
                });
            }

            let hi = num_bins - bpo * octave;
            let lo = hi - bpo;
            responses.push(self.octave_response(
                &y,
                sr,
                reference_sr,
                hop,
                &freqs[lo..hi],
                &params,
            )?);

            #[cfg(feature = "tracing")]
            tracing::debug!(octave, sr, hop, fmin = freqs[lo], "octave done");

            // The lowest octave needs no further decimation
            if hop % 2 == 0 && octave + 1 < num_octaves {
                if y.len() < 2 {
                    return Err(AnalysisError::SignalTooShort {
                        len: samples.len(),
                        num_octaves,
                    });
                }
                hop /= 2;
                let new_sr = sr / 2.0;
                y = self.resampler.resample(&y, sr, new_sr, quality, true)?;
                sr = new_sr;
            }
            progress.report(octave + 1, num_octaves);
        }

        let mut data = trim_stack(responses, num_bins);

        // Lengths at the rate the octave loop started from, so that early
        // downsampling leaves the output scale unchanged
        let WaveletLengths { lengths, .. } =
            wavelet_lengths(&freqs, reference_sr, &cfg.window, &params);
        for (row, length) in data.iter_mut().zip(lengths) {
            let norm = length.sqrt();
            for c in row.iter_mut() {
                *c /= norm;
            }
        }

        Ok(QTransformResult {
            data,
            frequencies: freqs,
            sample_rate,
            hop_length: cfg.hop_length,
            bins_per_octave: bpo,
            tuning,
        })
    }

    /// Filter response of one octave: FFT filter basis times the STFT.
    fn octave_response(
        &self,
        y: &[f64],
        sr: f64,
        reference_sr: f64,
        hop: usize,
        freqs: &[f64],
        params: &FilterBankParams,
    ) -> Result<ComplexMatrix> {
        let (mut basis, n_fft) = filter_fft(freqs, sr, &self.config.window, params)?;
        let gain = (reference_sr / sr).sqrt();
        for row in basis.iter_mut() {
            for c in row.iter_mut() {
                *c *= gain;
            }
        }

        let spectrum = stft(y, n_fft, hop, &Window::Ones)?;
        matmul(&basis, &spectrum)
    }
}

/// Frequency-domain wavelet filters for one octave, plus the FFT size.
///
/// Rows are the first `n_fft / 2 + 1` FFT outputs of each length-weighted filter.
fn filter_fft<W: WindowFunction + ?Sized>(
    freqs: &[f64],
    sample_rate: f64,
    window: &W,
    params: &FilterBankParams,
) -> Result<(ComplexMatrix, usize)> {
    let WaveletBasis { filters, lengths } =
        wavelet_basis(freqs, sample_rate, window, params, true, Norm::P(1.0))?;
    let n_fft = filters.first().map_or(0, Vec::len);
    let keep = n_fft / 2 + 1;

    let basis = filters
        .into_iter()
        .zip(&lengths)
        .map(|(mut row, &length)| {
            let weight = length / n_fft as f64;
            for c in row.iter_mut() {
                *c *= weight;
            }
            let mut spectrum = fft(&row);
            spectrum.truncate(keep);
            spectrum
        })
        .collect();

    Ok((basis, n_fft))
}

/// Stack per-octave responses (highest octave first) into `num_bins` rows,
/// trimming every row to the shortest frame count.
fn trim_stack(responses: Vec<ComplexMatrix>, num_bins: usize) -> ComplexMatrix {
    let min_frames = responses
        .iter()
        .filter_map(|r| r.first().map(Vec::len))
        .min()
        .unwrap_or(0);

    let mut data = vec![Vec::new(); num_bins];
    let mut end = num_bins;
    for response in responses {
        let rows = response.len().min(end);
        for (i, mut row) in response.into_iter().take(rows).enumerate() {
            row.truncate(min_frames);
            data[end - rows + i] = row;
        }
        end -= rows;
    }
    data
}

/// Constant-Q transform: `config` with the mode forced to [`QMode::Constant`].
pub fn cqt(samples: &[f64], sample_rate: f64, config: &QTransformConfig) -> Result<QTransformResult> {
    let config = QTransformConfig {
        mode: QMode::Constant,
        ..config.clone()
    };
    QTransform::new(config).process(samples, sample_rate)
}

/// Variable-Q transform with bandwidth offset `gamma` (0 = auditory default).
pub fn vqt(
    samples: &[f64],
    sample_rate: f64,
    config: &QTransformConfig,
    gamma: f64,
) -> Result<QTransformResult> {
    let config = QTransformConfig {
        mode: QMode::Variable { gamma },
        ..config.clone()
    };
    QTransform::new(config).process(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex64;
    use crate::error::ErrorKind;
    use std::f64::consts::PI;

    fn generate_sine(sample_rate: f64, freq: f64, duration_secs: f64) -> Vec<f64> {
        let num_samples = (duration_secs * sample_rate) as usize;
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    fn untuned() -> QTransformConfig {
        QTransformConfig {
            tuning: Some(0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_bin_layouts() {
        let signal = vec![0.0; 4096];
        let cases = [
            (0, 12, AnalysisError::InvalidBinCount),
            (0, 0, AnalysisError::InvalidBinCount),
            (12, 0, AnalysisError::InvalidBinsPerOctave),
            (
                30,
                12,
                AnalysisError::BinsNotOctaveMultiple {
                    num_bins: 30,
                    bins_per_octave: 12,
                },
            ),
        ];
        for (num_bins, bins_per_octave, expected) in cases {
            let config = QTransformConfig {
                num_bins,
                bins_per_octave,
                ..untuned()
            };
            let err = cqt(&signal, 22050.0, &config).unwrap_err();
            assert_eq!(err, expected);
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(vqt(&signal, 22050.0, &config, 0.0).is_err());
        }
    }

    #[test]
    fn test_invalid_rate_and_hop() {
        let signal = vec![0.0; 4096];
        assert!(matches!(
            cqt(&signal, 0.0, &untuned()),
            Err(AnalysisError::InvalidSampleRate(_))
        ));
        let config = QTransformConfig {
            hop_length: 0,
            ..untuned()
        };
        assert!(matches!(
            cqt(&signal, 22050.0, &config),
            Err(AnalysisError::InvalidParameter { name: "hop_length", .. })
        ));
    }

    #[test]
    fn test_nyquist_exceeded() {
        let signal = vec![0.0; 4096];
        let config = QTransformConfig {
            num_bins: 120,
            ..untuned()
        };
        let err = vqt(&signal, 22050.0, &config, 0.0).unwrap_err();
        match err {
            AnalysisError::NyquistExceeded {
                max_frequency,
                nyquist,
            } => {
                assert_eq!(nyquist, 11025.0);
                assert!(max_frequency > nyquist);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("Nyquist frequency 11025"));
    }

    #[test]
    fn test_a4_peak() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 440.0, 1.0);
        let result = cqt(&tone, sr, &untuned()).unwrap();

        assert_eq!(result.num_bins(), 84);
        assert_eq!(result.num_frames(), 22050 / 512 + 1);
        let mid = result.num_frames() / 2;
        assert_eq!(result.peak_bin(mid), Some(45));
        assert!((result.peak_frequency(mid).unwrap() - 440.0).abs() < 1e-6);
        assert!((result.midi_notes()[45] - 69.0).abs() < 1e-9);
    }

    #[test]
    fn test_early_downsampling_path() {
        // Four octaves topping out near B4 leave room for an 8x early decimation
        let sr = 22050.0;
        let tone = generate_sine(sr, 220.0, 2.0);
        let config = QTransformConfig {
            num_bins: 48,
            ..untuned()
        };
        let result = cqt(&tone, sr, &config).unwrap();

        assert_eq!(result.num_bins(), 48);
        let expected = tone.len() / 512 + 1;
        assert!(
            result.num_frames() <= expected && result.num_frames() + 1 >= expected,
            "frames {} vs {}",
            result.num_frames(),
            expected
        );
        // C1 + 33 semitones = A3
        assert_eq!(result.peak_bin(result.num_frames() / 2), Some(33));
    }

    #[test]
    fn test_signal_too_short_for_early_downsampling() {
        let config = QTransformConfig {
            num_bins: 48,
            ..untuned()
        };
        assert_eq!(
            cqt(&[0.1, 0.2, 0.3, 0.4], 22050.0, &config),
            Err(AnalysisError::SignalTooShort {
                len: 4,
                num_octaves: 4
            })
        );
    }

    #[test]
    fn test_early_downsampling_keeps_scale() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 220.0, 2.0);
        // 48 bins decimate 8x before the loop, 84 bins do not
        let config = QTransformConfig {
            num_bins: 48,
            ..untuned()
        };
        let short = cqt(&tone, sr, &config).unwrap();
        let full = cqt(&tone, sr, &untuned()).unwrap();

        let a3 = |r: &QTransformResult| r.data[33][r.num_frames() / 2].norm();
        let (lo, hi) = (a3(&short), a3(&full));
        assert!(
            (lo / hi - 1.0).abs() < 0.05,
            "A3 magnitude {} with 48 bins vs {} with 84 bins",
            lo,
            hi
        );
    }

    #[test]
    fn test_signal_too_short_for_octave_loop() {
        let signal: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        assert_eq!(
            cqt(&signal, 22050.0, &untuned()),
            Err(AnalysisError::SignalTooShort {
                len: 10,
                num_octaves: 7
            })
        );
    }

    #[test]
    fn test_best_quality_top_octave() {
        // Top filters reach past 85% of Nyquist
        let sr = 8000.0;
        let config = QTransformConfig {
            fmin: 55.0,
            num_bins: 72,
            ..untuned()
        };
        let tone = generate_sine(sr, 1760.0, 1.0);

        let mut reports = Vec::new();
        let result = QTransform::new(config)
            .process_with(
                &tone,
                sr,
                &mut |done: usize, total: usize| reports.push((done, total)),
                &CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(reports, (1..=6).map(|d| (d, 6)).collect::<Vec<_>>());
        assert_eq!(result.num_bins(), 72);
        // 55 Hz * 2^5 = 1760 Hz
        assert_eq!(result.peak_bin(result.num_frames() / 2), Some(60));
    }

    #[test]
    fn test_progress_reported_per_octave() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 440.0, 0.5);
        let mut reports = Vec::new();
        QTransform::new(untuned())
            .process_with(
                &tone,
                sr,
                &mut |done: usize, total: usize| reports.push((done, total)),
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(reports.len(), 7);
        assert_eq!(reports.last(), Some(&(7, 7)));
    }

    #[test]
    fn test_cancellation() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 440.0, 0.5);
        let transform = QTransform::new(untuned());

        let token = CancellationToken::new();
        token.cancel();
        let err = transform
            .process_with(&tone, sr, &mut NoProgress, &token)
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Cancelled {
                completed: 0,
                total: 7
            }
        );
        assert_eq!(err.kind(), ErrorKind::Cancelled);

        let token = CancellationToken::new();
        let trigger = token.clone();
        let mut sink = move |done: usize, _total: usize| {
            if done == 2 {
                trigger.cancel();
            }
        };
        let err = transform
            .process_with(&tone, sr, &mut sink, &token)
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Cancelled {
                completed: 2,
                total: 7
            }
        );
    }

    #[test]
    fn test_cqt_matches_constant_mode() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 330.0, 0.5);
        let config = QTransformConfig {
            mode: QMode::Variable { gamma: 5.0 },
            ..untuned()
        };
        let forced = cqt(&tone, sr, &config).unwrap();
        let explicit = QTransform::new(QTransformConfig {
            mode: QMode::Constant,
            ..untuned()
        })
        .process(&tone, sr)
        .unwrap();
        assert_eq!(forced, explicit);
    }

    #[test]
    fn test_vqt_shortens_low_filters() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 440.0, 1.0);
        let c = cqt(&tone, sr, &untuned()).unwrap();
        let v = vqt(&tone, sr, &untuned(), 0.0).unwrap();
        assert_eq!(c.num_bins(), v.num_bins());
        assert_eq!(c.num_frames(), v.num_frames());
        assert_ne!(c.data[0], v.data[0]);
        assert_eq!(v.peak_bin(v.num_frames() / 2), Some(45));
    }

    #[test]
    fn test_estimated_tuning_is_recorded() {
        let sr = 22050.0;
        let tone = generate_sine(sr, 440.0, 1.0);
        let result = cqt(&tone, sr, &QTransformConfig::default()).unwrap();
        assert!(result.tuning.abs() < 0.05, "tuning = {}", result.tuning);
        let expected_fmin = 32.70319566257483 * 2f64.powf(result.tuning / 12.0);
        assert!((result.frequencies[0] - expected_fmin).abs() < 1e-9);
    }

    #[test]
    fn test_trim_stack_order() {
        let c = |v: f64| Complex64::new(v, 0.0);
        let top = vec![vec![c(3.0), c(3.0), c(3.0)], vec![c(4.0), c(4.0), c(4.0)]];
        let bottom = vec![vec![c(1.0), c(1.0)], vec![c(2.0), c(2.0)]];
        let stacked = trim_stack(vec![top, bottom], 4);
        assert_eq!(stacked.len(), 4);
        for (i, row) in stacked.iter().enumerate() {
            assert_eq!(row, &vec![c(i as f64 + 1.0); 2]);
        }
    }

    #[test]
    fn test_result_helpers() {
        let result = QTransformResult {
            data: vec![
                vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
                vec![Complex64::new(0.0, 2.0), Complex64::new(0.5, 0.0)],
            ],
            frequencies: vec![220.0, 440.0],
            sample_rate: 1000.0,
            hop_length: 250,
            bins_per_octave: 1,
            tuning: 0.0,
        };
        assert_eq!(result.peak_bin(0), Some(1));
        assert_eq!(result.peak_bin(5), None);
        assert_eq!(result.frame_to_time(2), 0.5);
        assert_eq!(result.bin_to_freq(3), None);
        assert!((result.magnitude_db()[1][0] - 20.0 * 2f64.log10()).abs() < 1e-12);
        assert_eq!(result.magnitudes()[1], vec![2.0, 0.5]);
    }

    #[test]
    fn test_config_from_toml() {
        let config: QTransformConfig = toml::from_str(
            r#"
            num_bins = 48
            tuning = 0.1
            window = "hamming"
            mode = { type = "variable", gamma = 0.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.num_bins, 48);
        assert_eq!(config.tuning, Some(0.1));
        assert_eq!(config.window, Window::Hamming);
        assert_eq!(config.mode, QMode::Variable { gamma: 0.0 });
        assert_eq!(config.hop_length, 512);
    }
}
