//! Frequency grids and unit conversions.

/// A4 reference divided by 16, i.e. the frequency of octave 0 at A440 tuning.
const OCTAVE_ZERO_HZ: f64 = 440.0 / 16.0;

/// Center frequencies of the non-negative FFT bins: `i * sr / num_fft` for
/// `i` in `0..=num_fft / 2`.
pub fn fft_freq_bins(num_fft: usize, sample_rate: f64) -> Vec<f64> {
    let step = sample_rate / num_fft as f64;
    (0..=num_fft / 2).map(|i| i as f64 * step).collect()
}

/// Geometrically spaced center frequencies: `fmin * 2^(i / bins_per_octave)`.
pub fn qtransform_freq_bins(num_bins: usize, bins_per_octave: usize, fmin: f64) -> Vec<f64> {
    let bpo = bins_per_octave as f64;
    (0..num_bins)
        .map(|i| fmin * 2f64.powf(i as f64 / bpo))
        .collect()
}

/// Relative bandwidth `alpha` of a filter for the given (possibly
/// fractional) number of bins per octave.
pub fn compute_alpha(bins_per_octave: f64) -> f64 {
    let r = 2f64.powf(1.0 / bins_per_octave);
    let r2 = r * r;
    (r2 - 1.0) / (r2 + 1.0)
}

/// Octave number of a frequency relative to A440 tuning (A0 = 27.5 Hz is 0).
pub fn hz_to_octaves(freq: f64) -> f64 {
    (freq / OCTAVE_ZERO_HZ).log2()
}

/// MIDI note number of a frequency (A4 = 69).
pub fn hz_to_midi(freq: f64) -> f64 {
    69.0 + 12.0 * (freq / 440.0).log2()
}

/// Exponent of 2 in `n`. Zero has no factors by convention.
pub fn num_two_factors(n: usize) -> u32 {
    if n == 0 { 0 } else { n.trailing_zeros() }
}
