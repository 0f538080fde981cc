//! Audio file I/O for the Cadenza analysis tools.
//!
//! Analysis works on mono `f64` buffers, so reading mixes every channel
//! down to one and writing always produces a single-channel file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadenza_io::{read_wav, write_wav, WavSpec};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! println!("{} samples at {} Hz", samples.len(), spec.sample_rate);
//!
//! write_wav("copy.wav", &samples, WavSpec { bits_per_sample: 16, ..spec })?;
//! ```

mod wav;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
