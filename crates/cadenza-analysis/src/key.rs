//! Musical key estimation from a chromagram.
//!
//! Chroma energy is summed per pitch class over the whole signal, then
//! correlated against every rotation of a major and a minor key profile
//! (Krumhansl-Schmuckler). The profiles are the ones proposed in
//! D. Temperley, "What's Key for Key? The Krumhansl-Schmuckler Key-Finding
//! Algorithm Reconsidered", *Music Perception* 17(1), 1999, p. 74.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadenza_analysis::key::estimate_key;
//!
//! let keys = estimate_key(&samples, 22050.0, 3)?;
//! println!("{} (r = {:.3})", keys[0].key, keys[0].correlation);
//! ```

use crate::chroma::{Chromagram, chroma_cqt};
use crate::error::{AnalysisError, Result};
use crate::qtransform::QTransformConfig;
use crate::util::pearson_correlation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Major key profile, tonic first.
pub const MAJOR_PROFILE: [f64; 12] = [5.0, 2.0, 3.5, 2.0, 4.5, 4.0, 2.0, 4.5, 2.0, 3.5, 1.5, 4.0];

/// Minor key profile, tonic first.
pub const MINOR_PROFILE: [f64; 12] = [5.0, 2.0, 3.5, 4.5, 2.0, 4.0, 2.0, 4.5, 3.5, 2.0, 1.5, 4.0];

/// Number of distinct keys (12 tonics, major and minor).
pub const NUM_KEYS: usize = 24;

/// Bins per octave of the CQT behind [`estimate_key`].
const KEY_BINS_PER_OCTAVE: usize = 24;

/// Octaves analysed by [`estimate_key`], starting at C1.
const KEY_OCTAVES: usize = 7;

/// A major or minor key by tonic pitch class (0 = C, ..., 11 = B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key
    Major(usize),
    /// Minor key
    Minor(usize),
}

impl Key {
    /// Tonic pitch class.
    pub fn tonic(&self) -> usize {
        match *self {
            Key::Major(t) | Key::Minor(t) => t % 12,
        }
    }

    /// Whether this is a major key.
    pub fn is_major(&self) -> bool {
        matches!(self, Key::Major(_))
    }

    fn profile(&self) -> &'static [f64; 12] {
        match self {
            Key::Major(_) => &MAJOR_PROFILE,
            Key::Minor(_) => &MINOR_PROFILE,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tonic = Chromagram::pitch_class_names()[self.tonic()];
        let mode = if self.is_major() { "major" } else { "minor" };
        write!(f, "{tonic} {mode}")
    }
}

/// How well a key profile matches the observed pitch class distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyCorrelation {
    /// Candidate key
    pub key: Key,
    /// Pearson correlation with the rotated key profile, in `[-1, 1]`
    pub correlation: f64,
}

/// Total chroma energy per pitch class across all frames.
pub fn pitch_class_totals(chroma: &Chromagram) -> Vec<f64> {
    let mut totals = vec![0.0; chroma.num_chroma];
    for frame in &chroma.data {
        for (total, &value) in totals.iter_mut().zip(frame) {
            *total += value;
        }
    }
    totals
}

/// Correlate a 12-class chromagram with all 24 key profiles.
///
/// The result is sorted by decreasing correlation. Ties keep tonic order,
/// major before minor.
pub fn key_correlations(chroma: &Chromagram) -> Result<Vec<KeyCorrelation>> {
    if chroma.num_chroma != 12 {
        return Err(AnalysisError::invalid_parameter(
            "num_chroma",
            format!("key profiles need 12 pitch classes, got {}", chroma.num_chroma),
        ));
    }

    let totals = pitch_class_totals(chroma);
    let mut correlations = Vec::with_capacity(NUM_KEYS);
    for tonic in 0..12 {
        // Pitch class distribution seen from this tonic
        let rotated: Vec<f64> = (0..12).map(|i| totals[(tonic + i) % 12]).collect();
        for key in [Key::Major(tonic), Key::Minor(tonic)] {
            correlations.push(KeyCorrelation {
                key,
                correlation: pearson_correlation(key.profile(), &rotated),
            });
        }
    }

    correlations.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    Ok(correlations)
}

/// CQT settings used by [`estimate_key`]: seven octaves from C1 at 24 bins
/// per octave.
pub fn key_qtransform_config() -> QTransformConfig {
    QTransformConfig {
        bins_per_octave: KEY_BINS_PER_OCTAVE,
        num_bins: KEY_OCTAVES * KEY_BINS_PER_OCTAVE,
        ..Default::default()
    }
}

/// The `num_keys` most likely keys of a signal, best first.
///
/// `num_keys` must be between 1 and [`NUM_KEYS`].
pub fn estimate_key(
    samples: &[f64],
    sample_rate: f64,
    num_keys: usize,
) -> Result<Vec<KeyCorrelation>> {
    if !(1..=NUM_KEYS).contains(&num_keys) {
        return Err(AnalysisError::invalid_parameter(
            "num_keys",
            format!("must be between 1 and {NUM_KEYS}, got {num_keys}"),
        ));
    }
    let chroma = chroma_cqt(samples, sample_rate, &key_qtransform_config(), 12, 0.0)?;
    let mut keys = key_correlations(&chroma)?;
    keys.truncate(num_keys);
    Ok(keys)
}
