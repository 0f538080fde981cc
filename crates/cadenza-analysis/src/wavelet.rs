//! Wavelet filter-bank construction
//!
//! Each filter is a windowed complex sinusoid whose length is set by the
//! bin's quality factor. In constant-Q mode the length is inversely
//! proportional to frequency; variable-Q mode adds a bandwidth offset
//! `gamma` that shortens low-frequency filters.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::wavelet::{FilterBankParams, QMode, wavelet_lengths};
//! use cadenza_analysis::frequency::qtransform_freq_bins;
//! use cadenza_analysis::window::Window;
//!
//! let freqs = qtransform_freq_bins(24, 12, 110.0);
//! let params = FilterBankParams::new(QMode::Constant);
//! let result = wavelet_lengths(&freqs, 22050.0, &Window::Hann, &params);
//! assert!(result.lengths[0] > result.lengths[23]);
//! ```

use crate::complex::{ComplexMatrix, cis};
use crate::error::Result;
use crate::frequency::compute_alpha;
use crate::util::{Norm, lp_normalize, pad_center};
use crate::window::WindowFunction;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Glasberg-Moore equivalent rectangular bandwidth constant (24.7 / 0.108).
pub const ERB_GAMMA_SCALE: f64 = 24.7 / 0.108;

/// Bandwidth regime of the filter bank.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum QMode {
    /// Constant-Q: no bandwidth offset.
    #[default]
    Constant,
    /// Variable-Q with bandwidth offset `gamma` in Hz. Zero selects the
    /// auditory (ERB) offset per bin.
    Variable {
        /// Bandwidth offset (Hz), or 0 for automatic.
        gamma: f64,
    },
}

impl QMode {
    /// Whether this is the constant-Q regime.
    pub fn is_constant(&self) -> bool {
        matches!(self, QMode::Constant)
    }

    /// Bandwidth offset for a bin with relative bandwidth `alpha`.
    pub fn gamma(&self, alpha: f64) -> f64 {
        match *self {
            QMode::Constant => 0.0,
            QMode::Variable { gamma } if gamma == 0.0 => ERB_GAMMA_SCALE * alpha,
            QMode::Variable { gamma } => gamma,
        }
    }
}

/// Filter-bank design parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBankParams {
    /// Scales every filter's Q factor.
    pub filter_scale: f64,
    /// Constant- or variable-Q regime.
    pub mode: QMode,
    /// Relative bandwidth used when fewer than two frequencies are given.
    pub fallback_alpha: f64,
}

impl FilterBankParams {
    /// Unit filter scale with a semitone-spaced fallback alpha.
    pub fn new(mode: QMode) -> Self {
        Self {
            filter_scale: 1.0,
            mode,
            fallback_alpha: compute_alpha(12.0),
        }
    }
}

/// Per-bin filter lengths and the highest frequency any filter passes.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletLengths {
    /// Unpadded filter lengths in samples (real-valued).
    pub lengths: Vec<f64>,
    /// Upper frequency cutoff of the whole bank (Hz).
    pub cutoff: f64,
}

/// Time-domain filter bank.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletBasis {
    /// One row per bin, all center-padded to the same width.
    pub filters: ComplexMatrix,
    /// Unpadded filter lengths in samples.
    pub lengths: Vec<f64>,
}

/// Relative bandwidth of each bin, estimated from the local log-frequency slope.
fn relative_bandwidths(freqs: &[f64], fallback_alpha: f64) -> Vec<f64> {
    let n = freqs.len();
    if n < 2 {
        return vec![fallback_alpha; n];
    }

    let log_freqs: Vec<f64> = freqs.iter().map(|f| f.log2()).collect();
    (0..n)
        .map(|i| {
            let bpo = if i == 0 {
                1.0 / (log_freqs[1] - log_freqs[0])
            } else if i == n - 1 {
                1.0 / (log_freqs[n - 1] - log_freqs[n - 2])
            } else {
                2.0 / (log_freqs[i + 1] - log_freqs[i - 1])
            };
            compute_alpha(bpo)
        })
        .collect()
}

/// Filter lengths and overall frequency cutoff for the given center frequencies.
///
/// Frequencies must be strictly positive. An empty list yields no lengths
/// and a cutoff of 0.
pub fn wavelet_lengths<W: WindowFunction + ?Sized>(
    freqs: &[f64],
    sample_rate: f64,
    window: &W,
    params: &FilterBankParams,
) -> WaveletLengths {
    let alphas = relative_bandwidths(freqs, params.fallback_alpha);
    let bandwidth = window.bandwidth();

    let mut lengths = Vec::with_capacity(freqs.len());
    let mut cutoff = if freqs.is_empty() {
        0.0
    } else {
        f64::NEG_INFINITY
    };

    for (&freq, &alpha) in freqs.iter().zip(&alphas) {
        let gamma = params.mode.gamma(alpha);
        let q = params.filter_scale / alpha;
        cutoff = cutoff.max(freq * (1.0 + 0.5 * bandwidth / q) + 0.5 * gamma);
        lengths.push(q * sample_rate / (freq + gamma / alpha));
    }

    WaveletLengths { lengths, cutoff }
}

/// Build the complex time-domain filter bank.
///
/// Each row is `exp(i·2π·f·n/sr)` over `n ∈ [floor(-len/2), floor(len/2))`,
/// windowed, then normalized with `norm`. Rows are center-padded to the
/// longest filter, rounded up to a power of two when `pad_fft` is set.
pub fn wavelet_basis<W: WindowFunction + ?Sized>(
    freqs: &[f64],
    sample_rate: f64,
    window: &W,
    params: &FilterBankParams,
    pad_fft: bool,
    norm: Norm,
) -> Result<WaveletBasis> {
    let WaveletLengths { lengths, .. } = wavelet_lengths(freqs, sample_rate, window, params);

    let mut filters = Vec::with_capacity(freqs.len());
    for (&freq, &length) in freqs.iter().zip(&lengths) {
        let lower = (-length / 2.0).floor() as i64;
        let upper = (length / 2.0).floor() as i64;
        let n = (upper - lower).max(0) as usize;

        let step = 2.0 * PI * freq / sample_rate;
        let mut filter: Vec<_> = window
            .coefficients(n)
            .into_iter()
            .enumerate()
            .map(|(j, w)| cis((j as i64 + lower) as f64 * step) * w)
            .collect();
        lp_normalize(&mut filter, norm);
        filters.push(filter);
    }

    let max_len = lengths.iter().copied().fold(0.0, f64::max);
    let width = if pad_fft {
        2f64.powf(max_len.log2().ceil()) as usize
    } else {
        max_len.ceil() as usize
    };

    let filters = filters
        .iter()
        .map(|f| pad_center(f, width))
        .collect::<Result<ComplexMatrix>>()?;

    Ok(WaveletBasis { filters, lengths })
}
