//! TOML configuration shared by the analysis commands.
//!
//! ```toml
//! [qtransform]
//! hop_length = 256
//! bins_per_octave = 24
//! num_bins = 168
//! mode = { type = "variable", gamma = 0.0 }
//!
//! [tuning]
//! min_fft_freq = 100.0
//!
//! [stft]
//! num_fft = 4096
//! window = "blackman"
//! ```
//!
//! Missing sections and keys keep their defaults. Command-line flags
//! override whatever the file sets.

use cadenza_analysis::{QTransformConfig, TuningConfig, Window};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Parsed values that cannot work together
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// STFT settings for the `stft` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftSettings {
    /// FFT size
    pub num_fft: usize,
    /// Hop between frames
    pub hop_length: usize,
    /// Analysis window
    pub window: Window,
}

impl Default for StftSettings {
    fn default() -> Self {
        Self {
            num_fft: 2048,
            hop_length: 512,
            window: Window::Hann,
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Q-transform settings
    pub qtransform: QTransformConfig,
    /// Tuning estimator settings
    pub tuning: TuningConfig,
    /// STFT settings
    pub stft: StftSettings,
}

impl CliConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings that no command could run with.
    ///
    /// Checks that depend on the input signal are left to the analysis crate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = &self.qtransform;
        if q.hop_length == 0 {
            return Err(ConfigError::Invalid("qtransform.hop_length must be positive".into()));
        }
        if !(q.fmin.is_finite() && q.fmin > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "qtransform.fmin must be a positive frequency, got {}",
                q.fmin
            )));
        }
        if self.stft.num_fft == 0 || self.stft.hop_length == 0 {
            return Err(ConfigError::Invalid(
                "stft.num_fft and stft.hop_length must be positive".into(),
            ));
        }
        Ok(())
    }
}
