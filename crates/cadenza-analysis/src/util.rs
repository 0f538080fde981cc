//! Array helpers shared by the transforms.

use crate::complex::{Complex64, ComplexMatrix};
use crate::error::{AnalysisError, Result};
use std::ops::DivAssign;

/// Zero-pad `data` on both sides so it sits in the middle of `size` slots.
///
/// The left pad is `(size - len) / 2`; any odd remainder goes on the right.
pub fn pad_center<T: Copy + Default>(data: &[T], size: usize) -> Result<Vec<T>> {
    let len = data.len();
    if size < len {
        return Err(AnalysisError::PadTooShort { len, size });
    }
    let lpad = (size - len) / 2;
    let mut out = vec![T::default(); size];
    out[lpad..lpad + len].copy_from_slice(data);
    Ok(out)
}

/// Which norm to divide by in [`lp_normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Norm {
    /// Maximum magnitude (p = ∞).
    Max,
    /// Minimum magnitude (p = -∞).
    Min,
    /// Number of non-zero entries (p = 0).
    NonZero,
    /// Standard p-norm. Values of `p <= 0` leave the data untouched.
    P(f64),
}

impl Norm {
    /// Evaluate the norm over a set of magnitudes.
    ///
    /// Returns `None` when the norm is undefined for this variant.
    pub fn evaluate(&self, magnitudes: impl Iterator<Item = f64>) -> Option<f64> {
        match *self {
            Norm::Max => Some(magnitudes.fold(0.0, f64::max)),
            Norm::Min => magnitudes.reduce(f64::min),
            Norm::NonZero => Some(magnitudes.filter(|&m| m != 0.0).count() as f64),
            Norm::P(p) if p > 0.0 => Some(magnitudes.map(|m| m.powf(p)).sum::<f64>().powf(1.0 / p)),
            Norm::P(_) => None,
        }
    }
}

/// Element type that can be Lp-normalized.
pub trait Magnitude: Copy + DivAssign<f64> {
    /// Absolute value of the element.
    fn magnitude(self) -> f64;
}

impl Magnitude for f64 {
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Magnitude for Complex64 {
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Divide `values` in place by their norm.
///
/// Norms smaller than `f64::MIN_POSITIVE` leave the data unchanged, so an
/// all-zero vector stays all-zero.
pub fn lp_normalize<T: Magnitude>(values: &mut [T], norm: Norm) {
    let Some(length) = norm.evaluate(values.iter().map(|v| v.magnitude())) else {
        return;
    };
    if length < f64::MIN_POSITIVE {
        return;
    }
    for v in values.iter_mut() {
        *v /= length;
    }
}

/// Boolean mask of local maxima.
///
/// Index 0 is never a maximum. The last index needs to exceed its left
/// neighbour; interior indices must exceed the left neighbour and be at
/// least the right one.
pub fn find_local_maxima(values: &[f64]) -> Vec<bool> {
    let n = values.len();
    let mut mask = vec![false; n];
    for i in 1..n {
        let above_prev = values[i] > values[i - 1];
        mask[i] = if i + 1 < n {
            above_prev && values[i] >= values[i + 1]
        } else {
            above_prev
        };
    }
    mask
}

/// Median of a slice, or `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    Some(if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    })
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns 0 when either series is constant or the lengths differ.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator < f64::MIN_POSITIVE {
        return 0.0;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// Uniform histogram over `[start, end]`.
///
/// Bins are half-open except the last, which includes `end`. Values outside
/// the range (and NaNs) are skipped.
pub fn histogram(values: &[f64], start: f64, end: f64, num_bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_bins];
    if num_bins == 0 || end <= start {
        return counts;
    }
    let width = (end - start) / num_bins as f64;
    for &v in values {
        if !(start..=end).contains(&v) {
            continue;
        }
        let idx = (((v - start) / width).floor() as usize).min(num_bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Complex matrix product `a × b`.
pub fn matmul(a: &[Vec<Complex64>], b: &[Vec<Complex64>]) -> Result<ComplexMatrix> {
    let inner = b.len();
    let cols = b.first().map_or(0, |row| row.len());
    let mut out = Vec::with_capacity(a.len());
    for row in a {
        if row.len() != inner {
            return Err(AnalysisError::LengthMismatch {
                left: row.len(),
                right: inner,
            });
        }
        let mut acc = vec![Complex64::default(); cols];
        for (&coeff, b_row) in row.iter().zip(b.iter()) {
            if coeff == Complex64::default() {
                continue;
            }
            for (slot, &value) in acc.iter_mut().zip(b_row.iter()) {
                *slot += coeff * value;
            }
        }
        out.push(acc);
    }
    Ok(out)
}
