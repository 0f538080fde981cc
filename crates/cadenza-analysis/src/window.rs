//! Window functions
//!
//! Windows are consumed through the [`WindowFunction`] trait, which yields the
//! coefficients for a requested length and the window's equivalent noise
//! bandwidth in bins. [`Window`] covers the common generalized-cosine family.
//!
//! # Example
//!
//! ```rust
//! use cadenza_analysis::window::{Window, WindowFunction};
//!
//! let hann = Window::Hann.coefficients(4);
//! assert_eq!(hann.len(), 4);
//! assert!((Window::Hann.bandwidth() - 1.50018310546875).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// A window capability: coefficients for any length plus a bandwidth scalar.
pub trait WindowFunction {
    /// Window coefficients of length `len`.
    fn coefficients(&self, len: usize) -> Vec<f64>;

    /// Equivalent noise bandwidth in FFT bins.
    fn bandwidth(&self) -> f64;
}

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Window {
    /// All-ones (boxcar) window
    Ones,
    /// Hann window (raised cosine)
    #[default]
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Blackman-Harris window (better sidelobe suppression)
    BlackmanHarris,
}

impl Window {
    /// Generalized-cosine coefficients `a_k`.
    fn cosine_terms(&self) -> &'static [f64] {
        match self {
            Window::Ones => &[1.0],
            Window::Hann => &[0.5, 0.5],
            Window::Hamming => &[0.54, 0.46],
            Window::Blackman => &[0.42, 0.5, 0.08],
            Window::BlackmanHarris => &[0.35875, 0.48829, 0.14128, 0.01168],
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Window::Ones => "ones",
            Window::Hann => "hann",
            Window::Hamming => "hamming",
            Window::Blackman => "blackman",
            Window::BlackmanHarris => "blackman-harris",
        }
    }

    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let coeffs = self.coefficients(buffer.len());
        for (sample, w) in buffer.iter_mut().zip(coeffs) {
            *sample *= w;
        }
    }
}

impl WindowFunction for Window {
    /// Periodic (DFT-even) window: the first `len` points of a symmetric
    /// window of length `len + 1`.
    fn coefficients(&self, len: usize) -> Vec<f64> {
        match len {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => {
                let terms = self.cosine_terms();
                (0..len)
                    .map(|n| {
                        let x = 2.0 * PI * n as f64 / len as f64;
                        terms
                            .iter()
                            .enumerate()
                            .map(|(k, &a)| {
                                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                                sign * a * (k as f64 * x).cos()
                            })
                            .sum()
                    })
                    .collect()
            }
        }
    }

    fn bandwidth(&self) -> f64 {
        match self {
            Window::Ones => 1.0,
            Window::Hann => 1.50018310546875,
            Window::Hamming => 1.3629455320350348,
            Window::Blackman => 1.7269681554262326,
            Window::BlackmanHarris => 2.0045975283585014,
        }
    }
}

impl<W: WindowFunction + ?Sized> WindowFunction for &W {
    fn coefficients(&self, len: usize) -> Vec<f64> {
        (**self).coefficients(len)
    }

    fn bandwidth(&self) -> f64 {
        (**self).bandwidth()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ones" | "boxcar" | "rect" | "rectangular" | "none" => Ok(Window::Ones),
            "hann" | "hanning" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            "blackman-harris" | "blackmanharris" => Ok(Window::BlackmanHarris),
            other => Err(format!("unknown window '{other}'")),
        }
    }
}
