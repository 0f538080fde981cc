//! Cadenza Analysis - Constant-Q and variable-Q transforms for music audio
//!
//! This crate turns a mono signal into a log-frequency spectrogram whose bins
//! line up with musical pitches:
//!
//! - [`fft`] - Radix-2 and Bluestein FFT, real FFT, circular convolution
//! - [`window`] - Window functions and their noise bandwidths
//! - [`stft`] - Centered short-time Fourier transform and its inverse
//! - [`wavelet`] - Constant/variable-Q wavelet filter banks
//! - [`tuning`] - Tuning deviation from A440 equal temperament
//! - [`resample`] - Polyphase sinc resampling
//! - [`qtransform`] - The octave-by-octave CQT/VQT driver
//! - [`chroma`] - Pitch class profiles from a CQT
//! - [`key`] - Major/minor key estimation from a chromagram
//! - [`frequency`] - Frequency grids and unit conversions
//! - [`export`] - CSV and PGM export
//!
//! ## Constant-Q Transform
//!
//! ```rust
//! use cadenza_analysis::{QTransformConfig, cqt};
//!
//! let sr = 22050.0;
//! let signal: Vec<f64> = (0..22050)
//!     .map(|i| (2.0 * std::f64::consts::PI * 261.63 * i as f64 / sr).sin())
//!     .collect();
//!
//! let config = QTransformConfig {
//!     tuning: Some(0.0),
//!     ..Default::default()
//! };
//! let result = cqt(&signal, sr, &config).unwrap();
//! let midi = result.midi_notes()[result.peak_bin(20).unwrap()];
//! assert!((midi - 60.0).abs() < 0.5);
//! ```
//!
//! ## Progress and Cancellation
//!
//! ```rust,ignore
//! use cadenza_analysis::{CancellationToken, QTransform, QTransformConfig};
//!
//! let token = CancellationToken::new();
//! let mut report = |done: usize, total: usize| println!("octave {done}/{total}");
//! let result = QTransform::new(QTransformConfig::default())
//!     .process_with(&signal, 44100.0, &mut report, &token)?;
//! ```

pub mod chroma;
pub mod complex;
pub mod error;
pub mod export;
pub mod fft;
pub mod frequency;
pub mod key;
pub mod progress;
pub mod qtransform;
pub mod resample;
pub mod stft;
pub mod tuning;
pub mod util;
pub mod wavelet;
pub mod window;

// Re-export main types
pub use chroma::{Chromagram, chroma_cqt};
pub use complex::{Complex64, ComplexExt, ComplexMatrix};
pub use error::{AnalysisError, ErrorKind, Result};
pub use fft::{circular_convolution, fft, ifft, magnitude_db, phase_rad, rfft};
pub use frequency::{compute_alpha, fft_freq_bins, hz_to_midi, hz_to_octaves, qtransform_freq_bins};
pub use key::{Key, KeyCorrelation, estimate_key, key_correlations};
pub use progress::{CancellationToken, NoProgress, ProgressSink};
pub use qtransform::{QTransform, QTransformConfig, QTransformResult, cqt, vqt};
pub use resample::{ResampleQuality, Resampler, SincResampler};
pub use stft::{StftAnalyzer, istft, stft, stft_magnitudes};
pub use tuning::{PitchTrack, TuningConfig, TuningEstimator, estimate_tuning};
pub use util::Norm;
pub use wavelet::{FilterBankParams, QMode, WaveletBasis, WaveletLengths, wavelet_basis, wavelet_lengths};
pub use window::{Window, WindowFunction};
