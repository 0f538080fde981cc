//! Export formats for analysis results.
//!
//! - CSV for generic data exchange (one row per frame, time first)
//! - PGM for spectrogram images

use crate::chroma::Chromagram;
use crate::frequency::fft_freq_bins;
use crate::qtransform::QTransformResult;
use std::io::{BufWriter, Write};
use std::path::Path;

fn to_db(mag: f64) -> f64 {
    20.0 * mag.max(1e-10).log10()
}

/// Write a `[column][frame]` grid as CSV with a `time_s` column first.
fn write_frames_csv(
    path: &Path,
    labels: &[String],
    columns: &[Vec<f64>],
    frame_time: impl Fn(usize) -> f64,
    db_scale: bool,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    write!(file, "time_s")?;
    for label in labels {
        write!(file, ",{}", label)?;
    }
    writeln!(file)?;

    let num_frames = columns.first().map_or(0, Vec::len);
    for frame in 0..num_frames {
        write!(file, "{:.6}", frame_time(frame))?;
        for column in columns {
            let mag = column[frame];
            let value = if db_scale { to_db(mag) } else { mag };
            write!(file, ",{:.6}", value)?;
        }
        writeln!(file)?;
    }

    file.flush()
}

/// Export Q-transform magnitudes to CSV.
///
/// The header lists bin center frequencies; each following row is one frame,
/// starting with its time in seconds.
///
/// # Example
///
/// ```rust,ignore
/// use cadenza_analysis::{cqt, QTransformConfig, export::export_qtransform_csv};
///
/// let result = cqt(&signal, 22050.0, &QTransformConfig::default())?;
/// export_qtransform_csv(&result, "cqt.csv", true)?;
/// ```
pub fn export_qtransform_csv(
    result: &QTransformResult,
    path: impl AsRef<Path>,
    db_scale: bool,
) -> std::io::Result<()> {
    let labels: Vec<String> = result
        .frequencies
        .iter()
        .map(|f| format!("{:.2}", f))
        .collect();
    write_frames_csv(
        path.as_ref(),
        &labels,
        &result.magnitudes(),
        |frame| result.frame_to_time(frame),
        db_scale,
    )
}

/// Export STFT magnitudes (`[bin][frame]`) to CSV.
pub fn export_stft_csv(
    magnitudes: &[Vec<f64>],
    sample_rate: f64,
    num_fft: usize,
    hop_length: usize,
    path: impl AsRef<Path>,
    db_scale: bool,
) -> std::io::Result<()> {
    let labels: Vec<String> = fft_freq_bins(num_fft, sample_rate)
        .iter()
        .take(magnitudes.len())
        .map(|f| format!("{:.2}", f))
        .collect();
    write_frames_csv(
        path.as_ref(),
        &labels,
        magnitudes,
        |frame| frame as f64 * hop_length as f64 / sample_rate,
        db_scale,
    )
}

/// Export a chromagram to CSV, one column per pitch class.
pub fn export_chroma_csv(chroma: &Chromagram, path: impl AsRef<Path>) -> std::io::Result<()> {
    let labels: Vec<String> = if chroma.num_chroma == 12 {
        Chromagram::pitch_class_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        (0..chroma.num_chroma).map(|i| i.to_string()).collect()
    };

    // Stored frame-major; transpose to columns
    let columns: Vec<Vec<f64>> = (0..chroma.num_chroma)
        .map(|c| chroma.data.iter().map(|frame| frame[c]).collect())
        .collect();
    write_frames_csv(
        path.as_ref(),
        &labels,
        &columns,
        |frame| chroma.frame_to_time(frame),
        false,
    )
}

/// Export Q-transform magnitudes to a PGM grayscale image.
///
/// PGM is a simple ASCII image format that can be viewed by most image tools.
/// Time is on the X axis, frequency on Y axis (low frequencies at bottom).
///
/// # Arguments
///
/// * `result` - The transform to export
/// * `path` - Output file path
/// * `db_range` - Dynamic range in dB (values below max-db_range map to black)
pub fn export_qtransform_pgm(
    result: &QTransformResult,
    path: impl AsRef<Path>,
    db_range: f64,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    let width = result.num_frames();
    let height = result.num_bins();

    writeln!(file, "P2")?;
    writeln!(file, "# Q-transform export from cadenza-analysis")?;
    writeln!(file, "# Width: {} frames, Height: {} bins", width, height)?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;

    let db = result.magnitude_db();
    let max_db = db
        .iter()
        .flatten()
        .copied()
        .fold(to_db(0.0), f64::max);
    let range = db_range.max(f64::EPSILON);

    // Top to bottom = high to low frequency
    for row in db.iter().rev() {
        let pixels: Vec<String> = row
            .iter()
            .map(|&v| {
                let normalized = ((v - (max_db - range)) / range).clamp(0.0, 1.0);
                ((normalized * 255.0) as u8).to_string()
            })
            .collect();
        writeln!(file, "{}", pixels.join(" "))?;
    }

    file.flush()
}
