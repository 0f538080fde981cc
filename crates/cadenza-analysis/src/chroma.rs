//! Chromagram (pitch class profile) from a constant-Q transform.
//!
//! Q-transform bins are folded onto `num_chroma` pitch classes through a
//! fixed linear map, so every octave of C lands in the same chroma row.

use crate::error::{AnalysisError, Result};
use crate::frequency::hz_to_midi;
use crate::qtransform::{QTransformConfig, QTransformResult, cqt};
use crate::util::{Norm, lp_normalize};

/// Chroma vectors over time.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromagram {
    /// Chroma vectors `[frame][pitch_class]`, each scaled to a maximum of 1.
    pub data: Vec<Vec<f64>>,
    /// Number of pitch classes per frame.
    pub num_chroma: usize,
    /// Hop size in samples
    pub hop_length: usize,
    /// Sample rate
    pub sample_rate: f64,
}

impl Chromagram {
    /// Fold a Q-transform into `num_chroma` pitch classes.
    ///
    /// Values are floored at `threshold` before per-frame max normalization.
    /// `bins_per_octave` must be a multiple of `num_chroma`.
    pub fn from_qtransform(
        result: &QTransformResult,
        num_chroma: usize,
        threshold: f64,
    ) -> Result<Self> {
        // Undo tuning so the map lines up with the nominal pitch grid
        let fmin = result.frequencies.first().copied().unwrap_or(0.0)
            * 2f64.powf(-result.tuning / result.bins_per_octave.max(1) as f64);
        let map = chroma_map(
            result.num_bins(),
            num_chroma,
            result.bins_per_octave,
            fmin,
        )?;

        let magnitudes = result.magnitudes();
        let data = (0..result.num_frames())
            .map(|t| {
                let mut frame: Vec<f64> = map
                    .iter()
                    .map(|weights| {
                        let value: f64 = weights
                            .iter()
                            .zip(&magnitudes)
                            .map(|(&w, row)| w * row[t])
                            .sum();
                        value.max(threshold)
                    })
                    .collect();
                lp_normalize(&mut frame, Norm::Max);
                frame
            })
            .collect();

        Ok(Self {
            data,
            num_chroma,
            hop_length: result.hop_length,
            sample_rate: result.sample_rate,
        })
    }

    /// Get pitch class names
    pub fn pitch_class_names() -> [&'static str; 12] {
        ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"]
    }

    /// Number of time frames.
    pub fn num_frames(&self) -> usize {
        self.data.len()
    }

    /// Get the dominant pitch class for a frame
    pub fn dominant_pitch_class(&self, frame: usize) -> Option<usize> {
        self.data.get(frame).and_then(|chroma| {
            chroma
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, _)| i)
        })
    }

    /// Get frame time in seconds
    pub fn frame_to_time(&self, frame: usize) -> f64 {
        frame as f64 * self.hop_length as f64 / self.sample_rate
    }
}

/// Run a constant-Q transform and fold it into a chromagram.
pub fn chroma_cqt(
    samples: &[f64],
    sample_rate: f64,
    config: &QTransformConfig,
    num_chroma: usize,
    threshold: f64,
) -> Result<Chromagram> {
    if num_chroma == 0 || config.bins_per_octave % num_chroma != 0 {
        return Err(chroma_mismatch(config.bins_per_octave, num_chroma));
    }
    let result = cqt(samples, sample_rate, config)?;
    Chromagram::from_qtransform(&result, num_chroma, threshold)
}

fn chroma_mismatch(bins_per_octave: usize, num_chroma: usize) -> AnalysisError {
    AnalysisError::invalid_parameter(
        "num_chroma",
        format!("{bins_per_octave} bins per octave do not divide into {num_chroma} chroma"),
    )
}

/// Linear map from `num_input` Q-transform bins onto `num_chroma` pitch
/// classes, `[chroma][bin]`. Chroma 0 is C.
fn chroma_map(
    num_input: usize,
    num_chroma: usize,
    bins_per_octave: usize,
    fmin: f64,
) -> Result<Vec<Vec<f64>>> {
    if num_chroma == 0 || bins_per_octave % num_chroma != 0 {
        return Err(chroma_mismatch(bins_per_octave, num_chroma));
    }
    let merge = bins_per_octave / num_chroma;

    // Identity with each chroma spanning `merge` bins, rolled left to center
    // on the target bin.
    let shift = merge / 2;
    let octave: Vec<Vec<f64>> = (0..num_chroma)
        .map(|i| {
            (0..bins_per_octave)
                .map(|c| {
                    let src = (c + shift) % bins_per_octave;
                    if src / merge == i { 1.0 } else { 0.0 }
                })
                .collect()
        })
        .collect();

    // Repeat across octaves, truncated to the input size
    let tiled: Vec<Vec<f64>> = octave
        .iter()
        .map(|row| row.iter().copied().cycle().take(num_input).collect())
        .collect();

    let midi0 = hz_to_midi(fmin).rem_euclid(12.0);
    let roll = (midi0 * num_chroma as f64 / 12.0).round() as i64;
    let n = num_chroma as i64;
    Ok((0..num_chroma)
        .map(|r| tiled[(r as i64 - roll).rem_euclid(n) as usize].clone())
        .collect())
}
