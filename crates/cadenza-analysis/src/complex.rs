//! Complex number type and helpers.
//!
//! The crate uses [`Complex64`] from `num_complex` (via `rustfft`) for every
//! complex value. Arithmetic, conjugation, modulus (`norm`), phase (`arg`)
//! and the complex exponential (`exp`) come from that type; division by
//! zero yields IEEE infinities or NaNs rather than an error.
//!
//! [`ComplexExt`] adds decimal rounding used for tolerance comparisons.

pub use rustfft::num_complex::Complex64;

/// Row-major complex matrix.
pub type ComplexMatrix = Vec<Vec<Complex64>>;

/// Decimal rounding for complex values.
pub trait ComplexExt {
    /// Round both parts to `dp` decimal places (half away from zero).
    fn round_to(self, dp: u32) -> Self;

    /// Truncate both parts to `dp` decimal places.
    fn truncate_to(self, dp: u32) -> Self;
}

impl ComplexExt for Complex64 {
    fn round_to(self, dp: u32) -> Self {
        let scale = 10f64.powi(dp as i32);
        Complex64::new(
            (self.re * scale).round() / scale,
            (self.im * scale).round() / scale,
        )
    }

    fn truncate_to(self, dp: u32) -> Self {
        let scale = 10f64.powi(dp as i32);
        Complex64::new(
            (self.re * scale).trunc() / scale,
            (self.im * scale).trunc() / scale,
        )
    }
}

/// Unit phasor `e^(i·theta)`.
#[inline]
pub(crate) fn cis(theta: f64) -> Complex64 {
    Complex64::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_round_to() {
        let z = Complex64::new(1.23456, -9.87654);
        assert_eq!(z.round_to(2), Complex64::new(1.23, -9.88));
        assert_eq!(Complex64::new(0.125, -0.125).round_to(2), Complex64::new(0.13, -0.13));
    }

    #[test]
    fn test_truncate_to() {
        let z = Complex64::new(1.23956, -9.87654);
        assert_eq!(z.truncate_to(2), Complex64::new(1.23, -9.87));
    }

    #[test]
    fn test_exp_matches_euler() {
        let z = Complex64::new(0.5, PI / 3.0);
        let expected = Complex64::new(0.5f64.exp() * (PI / 3.0).cos(), 0.5f64.exp() * (PI / 3.0).sin());
        assert!((z.exp() - expected).norm() < 1e-12);
        assert!((cis(PI / 3.0) - Complex64::new(0.0, PI / 3.0).exp()).norm() < 1e-12);
    }

    #[test]
    fn test_divide_by_zero_is_not_finite() {
        let z = Complex64::new(1.0, 2.0) / Complex64::new(0.0, 0.0);
        assert!(!z.re.is_finite() || !z.im.is_finite());
    }

    #[test]
    fn test_basic_operations() {
        let a = Complex64::new(3.0, 4.0);
        let b = Complex64::new(1.0, -2.0);
        assert_eq!(a + b, Complex64::new(4.0, 2.0));
        assert_eq!(a - b, Complex64::new(2.0, 6.0));
        assert_eq!(a * b, Complex64::new(11.0, -2.0));
        assert_eq!(a.conj(), Complex64::new(3.0, -4.0));
        assert_eq!(a.norm(), 5.0);
        assert!(((a / b) * b - a).norm() < 1e-12);
        assert!((Complex64::new(0.0, 1.0).arg() - PI / 2.0).abs() < 1e-15);
    }
}
