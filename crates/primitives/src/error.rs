//! Error types for primitive parsing.

/// Errors that can occur while building primitive values.
#[derive(Debug, thiserror::Error)]
pub enum PrimitiveError {
    /// Malformed `YYYYMMDD` date.
    #[error("invalid trade date: {0:?} (expected YYYYMMDD)")]
    InvalidDate(String),
}
