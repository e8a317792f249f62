//! Validation for catalog records.
//!
//! Run before inserting records so malformed keys never reach the store.

use super::models::{Song, SongStats};
use std::fmt;

/// Validation error types
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField { field: &'static str },
    SurroundingWhitespace { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::SurroundingWhitespace { field, value } => {
                write!(
                    f,
                    "Field '{}' must not start or end with whitespace, got '{}'",
                    field, value
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn validate_isrc(isrc: &str) -> ValidationResult<()> {
    if isrc.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "isrc" });
    }
    if isrc.trim() != isrc {
        return Err(ValidationError::SurroundingWhitespace {
            field: "isrc",
            value: isrc.to_string(),
        });
    }
    Ok(())
}

/// Validate a song record
pub fn validate_song(song: &Song) -> ValidationResult<()> {
    validate_isrc(&song.isrc)
}

/// Validate a statistics record
pub fn validate_song_stats(stats: &SongStats) -> ValidationResult<()> {
    validate_isrc(&stats.isrc)
}
