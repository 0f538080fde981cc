//! FFT engine: radix-2 Cooley-Tukey with a Bluestein fallback for other lengths

use crate::complex::{Complex64, cis};
use crate::error::{AnalysisError, Result};
use std::f64::consts::PI;

/// Forward DFT of `x`.
///
/// Power-of-two lengths use the recursive radix-2 butterfly; every other
/// length goes through Bluestein's chirp-z convolution, which reuses the
/// radix-2 path internally. Lengths 0 and 1 are returned as-is.
pub fn fft(x: &[Complex64]) -> Vec<Complex64> {
    match x.len() {
        0 => Vec::new(),
        1 => x.to_vec(),
        n if n.is_power_of_two() => {
            let mut out = vec![Complex64::default(); n];
            radix2(x, 0, 1, &mut out);
            out
        }
        _ => bluestein(x),
    }
}

/// FFT of a real signal, keeping the `N/2 + 1` non-negative frequency bins.
pub fn rfft(x: &[f64]) -> Vec<Complex64> {
    let buffer: Vec<Complex64> = x.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut spectrum = fft(&buffer);
    spectrum.resize(x.len() / 2 + 1, Complex64::default());
    spectrum
}

/// Inverse DFT, normalized by `1/N`.
pub fn ifft(x: &[Complex64]) -> Vec<Complex64> {
    if x.is_empty() {
        return Vec::new();
    }
    let conjugated: Vec<Complex64> = x.iter().map(|c| c.conj()).collect();
    let scale = 1.0 / x.len() as f64;
    fft(&conjugated)
        .into_iter()
        .map(|c| c.conj() * scale)
        .collect()
}

/// Circular convolution of two equal-length sequences via the convolution theorem.
pub fn circular_convolution(a: &[Complex64], b: &[Complex64]) -> Result<Vec<Complex64>> {
    if a.len() != b.len() {
        return Err(AnalysisError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(convolve(a, b))
}

fn convolve(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let fa = fft(a);
    let fb = fft(b);
    let product: Vec<Complex64> = fa.iter().zip(fb.iter()).map(|(x, y)| x * y).collect();
    ifft(&product)
}

/// Radix-2 decimation in time.
///
/// Reads `out.len()` samples of `x` starting at `start` with the given
/// `stride`, writing the even-index transform into the first half of `out`
/// and the odd-index transform into the second before combining in place.
fn radix2(x: &[Complex64], start: usize, stride: usize, out: &mut [Complex64]) {
    let n = out.len();
    if n == 1 {
        out[0] = x[start];
        return;
    }

    let half = n / 2;
    let (even, odd) = out.split_at_mut(half);
    radix2(x, start, stride * 2, even);
    radix2(x, start + stride, stride * 2, odd);

    for k in 0..half {
        let w = cis(-2.0 * PI * k as f64 / n as f64);
        let p = even[k];
        let q = w * odd[k];
        even[k] = p + q;
        odd[k] = p - q;
    }
}

/// Bluestein's algorithm for arbitrary lengths.
fn bluestein(x: &[Complex64]) -> Vec<Complex64> {
    let n = x.len();
    let m = (2 * n + 1).next_power_of_two();

    // n^2 mod 2n keeps the chirp phase small for large n
    let modulus = 2 * n as u128;
    let chirp: Vec<Complex64> = (0..n)
        .map(|i| {
            let k = (i as u128 * i as u128) % modulus;
            cis(-PI * k as f64 / n as f64)
        })
        .collect();

    let mut a = vec![Complex64::default(); m];
    for (slot, (&xi, &ci)) in a.iter_mut().zip(x.iter().zip(chirp.iter())) {
        *slot = xi * ci;
    }

    let mut b = vec![Complex64::default(); m];
    b[0] = chirp[0].conj();
    for i in 1..n {
        b[i] = chirp[i].conj();
        b[m - i] = chirp[i].conj();
    }

    let conv = convolve(&a, &b);
    conv.iter()
        .zip(chirp.iter())
        .map(|(&c, &ch)| c * ch)
        .collect()
}

/// Compute magnitude spectrum in dB
pub fn magnitude_db(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| 20.0 * c.norm().max(1e-10).log10())
        .collect()
}

/// Compute phase spectrum in radians
pub fn phase_rad(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum.iter().map(|c| c.arg()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_close(actual: &[Complex64], expected: &[Complex64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!((a - e).norm() < tol, "index {}: {} vs {}", i, a, e);
        }
    }

    #[test]
    fn test_fft_power_of_two_fixture() {
        let x = [
            c(1.0, 0.0),
            c(0.0, 2.0),
            c(-3.0, 0.0),
            c(0.0, -4.0),
            c(5.0, 0.0),
            c(0.0, 6.0),
            c(-7.0, 0.0),
            c(0.0, -8.0),
        ];
        let expected = [
            c(-4.0, -4.0),
            c(-4.0, -9.65685425),
            c(36.0, 0.0),
            c(-4.0, 9.65685425),
            c(-4.0, 4.0),
            c(-4.0, 1.65685425),
            c(-4.0, 0.0),
            c(-4.0, -1.65685425),
        ];
        assert_close(&fft(&x), &expected, 1e-7);
    }

    #[test]
    fn test_fft_bluestein_fixture() {
        let x = [
            c(1.0, 0.0),
            c(0.0, 2.0),
            c(-3.0, 0.0),
            c(0.0, -4.0),
            c(5.0, 0.0),
            c(0.0, 6.0),
        ];
        let expected = [
            c(3.0, 4.0),
            c(-3.46410162, 14.92820323),
            c(-3.46410162, -14.92820323),
            c(3.0, -4.0),
            c(3.46410162, -1.07179677),
            c(3.46410162, 1.07179677),
        ];
        assert_close(&fft(&x), &expected, 1e-7);
    }

    #[test]
    fn test_rfft_odd_length() {
        let x = [1.0, 2.0, -3.0, -4.0, 5.0, 6.0, -7.0];
        let expected = [
            c(0.0, 0.0),
            c(-3.68598068, 5.64282152),
            c(0.03318787, -19.7157882),
            c(7.15279281, -2.16708578),
        ];
        assert_close(&rfft(&x), &expected, 1e-7);
    }

    #[test]
    fn test_trivial_lengths() {
        assert!(fft(&[]).is_empty());
        assert!(ifft(&[]).is_empty());
        let z = [c(2.5, -1.0)];
        assert_eq!(fft(&z), z.to_vec());
        assert_eq!(rfft(&[]).len(), 1);
    }

    #[test]
    fn test_fft_roundtrip() {
        for &n in &[16usize, 12, 7] {
            let x: Vec<Complex64> = (0..n)
                .map(|i| c((i as f64 * 0.37).sin(), (i as f64 * 1.3).cos()))
                .collect();
            let back = ifft(&fft(&x));
            assert_close(&back, &x, 1e-10);
        }
    }

    #[test]
    fn test_circular_convolution() {
        let a = [c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)];
        let b = [c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)];
        // Convolving with a delayed impulse rotates by one
        let out = circular_convolution(&a, &b).unwrap();
        assert_close(&out, &[c(3.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)], 1e-10);
    }

    #[test]
    fn test_circular_convolution_length_mismatch() {
        let err = circular_convolution(&[c(1.0, 0.0)], &[c(1.0, 0.0), c(2.0, 0.0)]).unwrap_err();
        assert_eq!(err, AnalysisError::LengthMismatch { left: 1, right: 2 });
    }

    #[test]
    fn test_dc_detection() {
        let spectrum = rfft(&vec![1.0; 256]);
        let dc_mag = spectrum[0].norm();
        let other_mag: f64 = spectrum[1..].iter().map(|c| c.norm()).sum();
        assert!((dc_mag - 256.0).abs() < 1e-9);
        assert!(other_mag < 1e-9);
    }

    #[test]
    fn test_magnitude_db_floor() {
        let db = magnitude_db(&[c(0.0, 0.0), c(1.0, 0.0), c(0.0, 10.0)]);
        assert!((db[0] + 200.0).abs() < 1e-9);
        assert!(db[1].abs() < 1e-12);
        assert!((db[2] - 20.0).abs() < 1e-12);
        assert!((phase_rad(&[c(0.0, 1.0)])[0] - PI / 2.0).abs() < 1e-15);
    }
}
