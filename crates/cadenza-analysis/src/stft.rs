//! Short-Time Fourier Transform
//!
//! Centered framing: the signal is zero-padded by `num_fft / 2` on each side,
//! so frame `t` is centered on sample `t * hop_length`. Output matrices are
//! indexed `[frequency_bin][frame]` with `num_fft / 2 + 1` rows.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::stft::StftAnalyzer;
//! use cadenza_analysis::window::Window;
//!
//! let signal: Vec<f64> = (0..4096).map(|i| (i as f64 * 0.1).sin()).collect();
//! let analyzer = StftAnalyzer::new(1024, 256, &Window::Hann).unwrap();
//! let spec = analyzer.process(&signal);
//! assert_eq!(spec.len(), 513);
//! assert_eq!(spec[0].len(), analyzer.num_frames(signal.len()));
//! ```

use crate::complex::{Complex64, ComplexMatrix};
use crate::error::{AnalysisError, Result};
use crate::fft::{ifft, rfft};
use crate::util::pad_center;
use crate::window::WindowFunction;

/// STFT (Short-Time Fourier Transform) analyzer
#[derive(Debug, Clone)]
pub struct StftAnalyzer {
    num_fft: usize,
    hop_length: usize,
    window_coeffs: Vec<f64>,
}

impl StftAnalyzer {
    /// Create a new STFT analyzer
    ///
    /// # Arguments
    /// * `num_fft` - Frame length and FFT size
    /// * `hop_length` - Samples between successive frames
    /// * `window` - Window function, evaluated once at `num_fft` points
    pub fn new<W: WindowFunction + ?Sized>(
        num_fft: usize,
        hop_length: usize,
        window: &W,
    ) -> Result<Self> {
        if num_fft == 0 {
            return Err(AnalysisError::invalid_parameter(
                "num_fft",
                "must be positive",
            ));
        }
        if hop_length == 0 {
            return Err(AnalysisError::invalid_parameter(
                "hop_length",
                "must be positive",
            ));
        }
        let window_coeffs = pad_center(&window.coefficients(num_fft), num_fft)?;

        Ok(Self {
            num_fft,
            hop_length,
            window_coeffs,
        })
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn num_frames(&self, len: usize) -> usize {
        len / self.hop_length + 1
    }

    /// Number of frequency bins per frame (`num_fft / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.num_fft / 2 + 1
    }

    /// Complex STFT, `[bin][frame]`.
    pub fn process(&self, signal: &[f64]) -> ComplexMatrix {
        let num_frames = self.num_frames(signal.len());
        let num_bins = self.num_bins();

        // Padding to len + num_fft can never be short
        let lpad = self.num_fft / 2;
        let mut padded = vec![0.0; signal.len() + self.num_fft];
        padded[lpad..lpad + signal.len()].copy_from_slice(signal);

        let mut out = vec![vec![Complex64::default(); num_frames]; num_bins];
        let mut frame = vec![0.0; self.num_fft];

        for t in 0..num_frames {
            let start = t * self.hop_length;
            let source = &padded[start..start + self.num_fft];
            for ((dst, &x), &w) in frame.iter_mut().zip(source).zip(&self.window_coeffs) {
                *dst = x * w;
            }

            for (row, value) in out.iter_mut().zip(rfft(&frame)) {
                row[t] = value;
            }
        }

        out
    }

    /// Magnitude STFT, `[bin][frame]`.
    pub fn magnitudes(&self, signal: &[f64]) -> Vec<Vec<f64>> {
        self.process(signal)
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.norm()).collect())
            .collect()
    }

    /// Inverse STFT by weighted overlap-add.
    ///
    /// `matrix` must have `num_fft / 2 + 1` rows. The output is trimmed to
    /// `length` samples when given, otherwise to `(frames - 1) * hop_length`.
    pub fn inverse(&self, matrix: &[Vec<Complex64>], length: Option<usize>) -> Result<Vec<f64>> {
        let num_bins = self.num_bins();
        if matrix.len() != num_bins {
            return Err(AnalysisError::LengthMismatch {
                left: matrix.len(),
                right: num_bins,
            });
        }
        let num_frames = matrix[0].len();
        if matrix.iter().any(|row| row.len() != num_frames) {
            return Err(AnalysisError::invalid_parameter(
                "matrix",
                "rows must all have the same number of frames",
            ));
        }
        if num_frames == 0 {
            return Ok(vec![0.0; length.unwrap_or(0)]);
        }

        let n = self.num_fft;
        let total = n + self.hop_length * (num_frames - 1);
        let mut signal = vec![0.0; total];
        let mut window_sum = vec![0.0; total];
        let mut spectrum = vec![Complex64::default(); n];

        for t in 0..num_frames {
            // Rebuild the full Hermitian spectrum from the half spectrum
            for k in 0..n {
                spectrum[k] = if k < num_bins {
                    matrix[k][t]
                } else {
                    matrix[n - k][t].conj()
                };
            }
            let frame = ifft(&spectrum);

            let start = t * self.hop_length;
            for (i, (&w, value)) in self.window_coeffs.iter().zip(frame).enumerate() {
                signal[start + i] += value.re * w;
                window_sum[start + i] += w * w;
            }
        }

        for (s, &w) in signal.iter_mut().zip(&window_sum) {
            if w > f64::MIN_POSITIVE {
                *s /= w;
            }
        }

        let lpad = n / 2;
        let expected = length.unwrap_or(self.hop_length * (num_frames - 1));
        let mut out: Vec<f64> = signal.into_iter().skip(lpad).take(expected).collect();
        out.resize(expected, 0.0);
        Ok(out)
    }

    /// Get FFT size
    pub fn num_fft(&self) -> usize {
        self.num_fft
    }

    /// Get hop length
    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Window coefficients, center-padded to `num_fft`.
    pub fn window_coeffs(&self) -> &[f64] {
        &self.window_coeffs
    }
}

/// Complex STFT of `signal`, `[bin][frame]`.
pub fn stft<W: WindowFunction + ?Sized>(
    signal: &[f64],
    num_fft: usize,
    hop_length: usize,
    window: &W,
) -> Result<ComplexMatrix> {
    Ok(StftAnalyzer::new(num_fft, hop_length, window)?.process(signal))
}

/// Magnitude STFT of `signal`, `[bin][frame]`.
pub fn stft_magnitudes<W: WindowFunction + ?Sized>(
    signal: &[f64],
    num_fft: usize,
    hop_length: usize,
    window: &W,
) -> Result<Vec<Vec<f64>>> {
    Ok(StftAnalyzer::new(num_fft, hop_length, window)?.magnitudes(signal))
}

/// Inverse of [`stft`]. The FFT size is inferred from the row count.
pub fn istft<W: WindowFunction + ?Sized>(
    matrix: &[Vec<Complex64>],
    hop_length: usize,
    window: &W,
    length: Option<usize>,
) -> Result<Vec<f64>> {
    if matrix.len() < 2 {
        return Err(AnalysisError::invalid_parameter(
            "matrix",
            "needs at least two frequency bins",
        ));
    }
    let num_fft = 2 * (matrix.len() - 1);
    StftAnalyzer::new(num_fft, hop_length, window)?.inverse(matrix, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Window;
    use std::f64::consts::PI;

    const ARRAY: [f64; 8] = [1.0, 2.0, -3.0, -4.0, 5.0, 6.0, -7.0, -8.0];

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_matrix(actual: &ComplexMatrix, expected: &[Vec<Complex64>]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a_row, e_row)) in actual.iter().zip(expected).enumerate() {
            assert_eq!(a_row.len(), e_row.len());
            for (j, (a, e)) in a_row.iter().zip(e_row).enumerate() {
                assert!((a - e).norm() < 1e-9, "[{}][{}]: {} vs {}", i, j, a, e);
            }
        }
    }

    fn generate_sine(sample_rate: f64, freq: f64, duration_secs: f64) -> Vec<f64> {
        let num_samples = (duration_secs * sample_rate) as usize;
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_stft_ones_fixture() {
        let out = stft(&ARRAY, 4, 3, &Window::Ones).unwrap();
        let expected = vec![
            vec![c(3.0, 0.0), c(0.0, 0.0), c(-4.0, 0.0)],
            vec![c(-1.0, 2.0), c(6.0, 8.0), c(12.0, -14.0)],
            vec![c(-1.0, 0.0), c(-4.0, 0.0), c(0.0, 0.0)],
        ];
        assert_matrix(&out, &expected);
    }

    #[test]
    fn test_stft_hann_fixture() {
        let out = stft(&ARRAY, 4, 3, &Window::Hann).unwrap();
        let expected = vec![
            vec![c(2.0, 0.0), c(-3.0, 0.0), c(-8.0, 0.0)],
            vec![c(-1.0, 1.0), c(4.0, 4.0), c(7.0, -7.0)],
            vec![c(0.0, 0.0), c(-5.0, 0.0), c(-6.0, 0.0)],
        ];
        assert_matrix(&out, &expected);
    }

    #[test]
    fn test_stft_magnitudes_are_modulus() {
        let mags = stft_magnitudes(&ARRAY, 4, 3, &Window::Ones).unwrap();
        assert!((mags[1][1] - 10.0).abs() < 1e-9);
        assert!((mags[1][0] - 5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(stft(&ARRAY, 0, 3, &Window::Ones).is_err());
        assert!(stft(&ARRAY, 4, 0, &Window::Ones).is_err());
    }

    #[test]
    fn test_spectrogram_dimensions() {
        let signal = generate_sine(44100.0, 440.0, 1.0);
        let analyzer = StftAnalyzer::new(1024, 512, &Window::Hann).unwrap();
        let spec = analyzer.process(&signal);

        assert_eq!(spec.len(), 513);
        assert_eq!(spec[0].len(), 44100 / 512 + 1);
    }

    #[test]
    fn test_spectrogram_peak_detection() {
        let sample_rate = 44100.0;
        let freq = 1000.0;
        let signal = generate_sine(sample_rate, freq, 0.5);
        let mags = stft_magnitudes(&signal, 2048, 1024, &Window::Hann).unwrap();

        // Skip the half-empty edge frames
        let frames = mags[0].len();
        for t in 1..frames - 1 {
            let peak = (0..mags.len())
                .max_by(|&a, &b| mags[a][t].total_cmp(&mags[b][t]))
                .unwrap();
            let peak_freq = peak as f64 * sample_rate / 2048.0;
            assert!(
                (peak_freq - freq).abs() < 25.0,
                "Peak {} Hz should be near {} Hz",
                peak_freq,
                freq
            );
        }
    }

    #[test]
    fn test_istft_roundtrip_fixture() {
        for window in [Window::Ones, Window::Hann] {
            let spec = stft(&ARRAY, 4, 3, &window).unwrap();
            let back = istft(&spec, 3, &window, None).unwrap();
            let expected = [1.0, 2.0, -3.0, -4.0, 5.0, 6.0];
            assert_eq!(back.len(), expected.len());
            for (a, b) in back.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-9, "{:?}: {} vs {}", window, a, b);
            }
        }
    }

    #[test]
    fn test_istft_roundtrip_long_signal() {
        let signal = generate_sine(8000.0, 440.0, 0.25);
        let spec = stft(&signal, 512, 128, &Window::Hann).unwrap();
        let back = istft(&spec, 128, &Window::Hann, Some(signal.len())).unwrap();
        assert_eq!(back.len(), signal.len());
        for (a, b) in back.iter().zip(signal.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_istft_shape_checks() {
        let analyzer = StftAnalyzer::new(4, 3, &Window::Ones).unwrap();
        let bad = vec![vec![c(0.0, 0.0); 3]; 2];
        assert!(analyzer.inverse(&bad, None).is_err());
        assert!(istft(&bad[..1], 3, &Window::Ones, None).is_err());
    }
}
