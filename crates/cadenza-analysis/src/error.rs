//! Error types for analysis operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Broad classification of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied value is out of range or inconsistent.
    InvalidArgument,
    /// Two operands that must have equal length do not.
    LengthMismatch,
    /// The computation was stopped through a cancellation token.
    Cancelled,
}

/// Errors that can occur during analysis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Requested bin count is zero
    #[error("Number of frequency bins cannot be negative or zero.")]
    InvalidBinCount,

    /// Requested bins per octave is zero
    #[error("Number of bins per octave cannot be negative or zero")]
    InvalidBinsPerOctave,

    /// Bin count does not divide into whole octaves
    #[error(
        "Number of bins is not a multiple of the number of bins per octave. \
         ({num_bins} bins, {bins_per_octave} bins per octave)"
    )]
    BinsNotOctaveMultiple {
        /// Requested number of bins.
        num_bins: usize,
        /// Requested bins per octave.
        bins_per_octave: usize,
    },

    /// Filter bank would reach past the Nyquist frequency
    #[error(
        "Wavelet basis with max frequency {max_frequency} would exceed the Nyquist frequency \
         {nyquist}. Try reducing the number of frequency bins."
    )]
    NyquistExceeded {
        /// Highest center frequency of the requested grid (Hz).
        max_frequency: f64,
        /// Nyquist frequency of the input (Hz).
        nyquist: f64,
    },

    /// Signal is shorter than the early downsampling factor
    #[error("Input signal length of {len} is too short for {num_octaves}-octave QTransform")]
    SignalTooShort {
        /// Length of the input signal in samples.
        len: usize,
        /// Number of octaves the transform spans.
        num_octaves: usize,
    },

    /// Resampling would produce an empty signal
    #[error("resampling {len} samples from {src_rate} Hz to {dst_rate} Hz leaves no output")]
    ResampleTooShort {
        /// Length of the input signal in samples.
        len: usize,
        /// Source sample rate (Hz).
        src_rate: f64,
        /// Target sample rate (Hz).
        dst_rate: f64,
    },

    /// Sample rate is not a positive finite number
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// Generic out-of-range parameter
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Center padding target is smaller than the data
    #[error("cannot center-pad {len} values into {size}")]
    PadTooShort {
        /// Length of the data being padded.
        len: usize,
        /// Requested padded size.
        size: usize,
    },

    /// Operands of a pairwise operation differ in length
    #[error("The lengths of the vectors are not equal. ({left} vs {right})")]
    LengthMismatch {
        /// Length of the first operand.
        left: usize,
        /// Length of the second operand.
        right: usize,
    },

    /// Computation stopped by a cancellation token
    #[error("cancelled after {completed} of {total} octaves")]
    Cancelled {
        /// Octaves finished before cancellation was observed.
        completed: usize,
        /// Total octaves requested.
        total: usize,
    },
}

impl AnalysisError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            AnalysisError::Cancelled { .. } => ErrorKind::Cancelled,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
