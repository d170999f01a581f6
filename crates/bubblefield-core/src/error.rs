//! Error types for field construction.

use thiserror::Error;

/// Errors raised while building a field from caller-supplied items.
///
/// Everything past construction degrades in place instead of failing:
/// malformed configuration falls back to defaults, unknown ids are
/// skipped, out-of-bounds pointer coordinates are clamped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("duplicate item id: {0}")]
    DuplicateId(String),
    #[error("item id must not be empty")]
    EmptyId,
}
