//! CLI command implementations.

pub mod chroma;
pub mod common;
pub mod cqt;
pub mod generate;
pub mod info;
pub mod key;
pub mod stft;
pub mod tuning;
