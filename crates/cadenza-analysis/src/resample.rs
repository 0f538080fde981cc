//! Sample-rate conversion by polyphase windowed-sinc filtering.
//!
//! Implements polyphase FIR resampling using windowed-sinc lowpass filters with
//! Blackman windowing. Arbitrary rate ratios are approximated by a rational
//! P/Q through continued fractions (e.g., 44100 → 48000 Hz via P=160, Q=147).
//!
//! # Theory
//!
//! Resampling by rational factor P/Q is equivalent to upsampling by P, applying
//! a lowpass filter at `min(1/P, 1/Q)` (normalized frequency), then downsampling
//! by Q. The polyphase decomposition avoids explicit zero-insertion by computing
//! only the output samples actually needed. The prototype's group delay is
//! compensated so output sample `m` lines up with input time `m·Q/P`.
//!
//! The anti-aliasing lowpass uses a windowed-sinc design:
//!   `h[n] = sinc(cutoff * (n - M/2)) * w[n]`
//! where `w[n]` is a Blackman window and the result is normalized to unity DC gain.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*, Prentice Hall,
//! 1993, Chapter 4.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::resample::{ResampleQuality, Resampler, SincResampler};
//!
//! let sr = 48000.0;
//! let signal: Vec<f64> = (0..4800)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / sr).sin())
//!     .collect();
//!
//! // Halve the rate: 48 kHz → 24 kHz
//! let halved = SincResampler
//!     .resample(&signal, sr, 24000.0, ResampleQuality::Fast, false)
//!     .unwrap();
//! assert_eq!(halved.len(), signal.len() / 2);
//!
//! // Arbitrary rate: 48 kHz → 44.1 kHz
//! let resampled = SincResampler
//!     .resample(&signal, sr, 44100.0, ResampleQuality::Fast, false)
//!     .unwrap();
//! assert_eq!(resampled.len(), 4410);
//! ```

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Largest denominator accepted when approximating a rate ratio.
const MAX_DENOMINATOR: u64 = 1000;

/// Filter quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleQuality {
    /// Short filter with a wide transition band.
    #[default]
    Fast,
    /// Long filter with a transition band close to Nyquist.
    Best,
}

impl ResampleQuality {
    /// Sinc zero crossings on each side of the prototype center.
    pub fn zero_crossings(&self) -> usize {
        match self {
            ResampleQuality::Fast => 16,
            ResampleQuality::Best => 48,
        }
    }

    /// Passband edge as a fraction of the lower Nyquist frequency.
    pub fn rolloff(&self) -> f64 {
        match self {
            ResampleQuality::Fast => 0.85,
            ResampleQuality::Best => 0.945,
        }
    }
}

/// Sample-rate conversion capability.
pub trait Resampler {
    /// Convert `signal` from `src_rate` to `dst_rate`.
    ///
    /// With `scale` set, the output is divided by `sqrt(dst_rate / src_rate)`
    /// so that energy rather than amplitude is preserved.
    fn resample(
        &self,
        signal: &[f64],
        src_rate: f64,
        dst_rate: f64,
        quality: ResampleQuality,
        scale: bool,
    ) -> Result<Vec<f64>>;
}

/// Polyphase windowed-sinc resampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SincResampler;

impl Resampler for SincResampler {
    fn resample(
        &self,
        signal: &[f64],
        src_rate: f64,
        dst_rate: f64,
        quality: ResampleQuality,
        scale: bool,
    ) -> Result<Vec<f64>> {
        for rate in [src_rate, dst_rate] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(AnalysisError::InvalidSampleRate(rate));
            }
        }
        if src_rate == dst_rate {
            return Ok(signal.to_vec());
        }

        let ratio = dst_rate / src_rate;
        let out_len = (signal.len() as f64 * ratio).floor() as usize;
        if out_len < 1 {
            return Err(AnalysisError::ResampleTooShort {
                len: signal.len(),
                src_rate,
                dst_rate,
            });
        }

        let (p, q) = rational_approximation(ratio, MAX_DENOMINATOR);
        if p == 0 {
            return Err(AnalysisError::invalid_parameter(
                "dst_rate",
                format!("rate ratio {ratio} is below 1/{MAX_DENOMINATOR}"),
            ));
        }

        let widest = p.max(q);
        let num_taps =
            2 * (quality.zero_crossings() as f64 * widest as f64 / quality.rolloff()).ceil() as usize
                + 1;
        let prototype = design_lowpass(num_taps, quality.rolloff() / widest as f64);

        #[cfg(feature = "tracing")]
        tracing::debug!(src_rate, dst_rate, p, q, num_taps, ?quality, "resampling");

        let mut output = polyphase(signal, p, q, &prototype, out_len);
        if scale {
            let gain = ratio.sqrt();
            for x in output.iter_mut() {
                *x /= gain;
            }
        }
        Ok(output)
    }
}

/// Best rational approximation `p/q` of `x` with `q <= max_denominator`,
/// taken from the continued-fraction convergents.
fn rational_approximation(x: f64, max_denominator: u64) -> (usize, usize) {
    let (mut h_prev, mut h) = (0u64, 1u64);
    let (mut k_prev, mut k) = (1u64, 0u64);
    let mut frac = x;

    for _ in 0..64 {
        let a = frac.floor();
        let a_int = a as u64;
        let h_next = a_int * h + h_prev;
        let k_next = a_int * k + k_prev;
        if k_next > max_denominator {
            break;
        }
        (h_prev, h) = (h, h_next);
        (k_prev, k) = (k, k_next);

        let rem = frac - a;
        if rem < 1e-12 {
            break;
        }
        frac = 1.0 / rem;
    }

    (h as usize, k.max(1) as usize)
}

/// Compute windowed-sinc lowpass FIR coefficients.
///
/// Designs a Type I linear-phase FIR lowpass filter using the windowed-sinc
/// method with a Blackman window. The filter is normalized to have unity gain
/// at DC (sum of coefficients = 1.0).
///
/// The impulse response is:
///   `h[n] = sinc(cutoff * (n - M/2)) * w_blackman[n]`
/// where sinc(x) = sin(π·x) / (π·x) and M = num_taps - 1.
///
/// # Arguments
///
/// * `num_taps` - Number of filter taps. Odd tap counts produce a symmetric
///   Type I filter.
/// * `cutoff` - Normalized cutoff frequency in the range (0.0, 1.0),
///   where 1.0 corresponds to the Nyquist frequency (fs/2).
///
/// Reference: A. V. Oppenheim and R. W. Schafer, *Discrete-Time Signal Processing*,
/// 3rd ed., Prentice Hall, 2009, Section 7.6.
pub fn design_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    if num_taps == 0 {
        return Vec::new();
    }

    let m = (num_taps - 1) as f64;
    let mut coeffs: Vec<f64> = (0..num_taps)
        .map(|n| {
            let x = n as f64 - m / 2.0;
            let sinc = if x.abs() < 1e-9 {
                cutoff
            } else {
                (PI * cutoff * x).sin() / (PI * x)
            };
            let window = if num_taps == 1 {
                1.0
            } else {
                let phase = 2.0 * PI * n as f64 / m;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            };
            sinc * window
        })
        .collect();

    let sum: f64 = coeffs.iter().sum();
    if sum.abs() > 1e-12 {
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
    }

    coeffs
}

/// Polyphase evaluation of `prototype` at the P/Q output grid.
///
/// Sub-filter `k` holds prototype taps `k, k+P, k+2P, ...`. Output `m` sits at
/// position `m·Q + (taps-1)/2` in the P-upsampled sequence, which removes the
/// prototype's group delay.
fn polyphase(signal: &[f64], p: usize, q: usize, prototype: &[f64], out_len: usize) -> Vec<f64> {
    let taps_per_phase = prototype.len().div_ceil(p);
    let mut phases = vec![vec![0.0; taps_per_phase]; p];
    for (tap_idx, &coeff) in prototype.iter().enumerate() {
        phases[tap_idx % p][tap_idx / p] = coeff;
    }

    let delay = prototype.len().saturating_sub(1) / 2;
    let gain = p as f64;

    (0..out_len)
        .map(|m| {
            let full_idx = m * q + delay;
            let n = full_idx / p;
            let sub_filter = &phases[full_idx % p];

            // y[m] = sum_i sub_filter[i] * x[n - i]
            let first = n.saturating_sub(signal.len() - 1);
            let last = n.min(taps_per_phase - 1);
            let acc: f64 = (first..=last)
                .map(|i| sub_filter[i] * signal[n - i])
                .sum();
            acc * gain
        })
        .collect()
}
