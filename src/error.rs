//! Error types surfaced by the few fallible operations of the crate.
//!
//! Malformed sprite configuration is never an error: it is recovered in place
//! with defaults. Only settings file I/O and image loading report failures.

use thiserror::Error;

/// Failure while reading or writing the INI settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Read(String),
    #[error("failed to write settings file: {0}")]
    Write(#[from] std::io::Error),
}

/// Failure reported by the host when a sprite sheet image cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("sprite image not found: {0}")]
    NotFound(String),
    #[error("sprite image unreadable: {0}")]
    Unreadable(String),
    #[error("image loader is gone")]
    LoaderGone,
}
