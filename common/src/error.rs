//! Error types shared across RateMesh crates.

use thiserror::Error;

/// Errors raised while parsing a textual rate quote such as `USD/CAD=1.34`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseQuoteError {
    /// The `=` between pair and rate is missing.
    #[error("Missing '=' in quote: {0}")]
    MissingRate(String),

    /// The `/` between the two currency codes is missing.
    #[error("Missing '/' in currency pair: {0}")]
    MissingSeparator(String),

    /// One side of the pair is blank.
    #[error("Empty currency code in quote: {0}")]
    EmptyCurrency(String),

    /// The rate is not a number.
    #[error("Invalid rate '{value}': {reason}")]
    InvalidRate { value: String, reason: String },
}
