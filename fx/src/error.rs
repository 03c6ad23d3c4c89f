//! FX registry error types.

use ratemesh_common::Currency;
use thiserror::Error;

/// Errors that can occur in the FX registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// No chain of recorded rates connects the two currencies.
    #[error("No conversion path between {from} and {to}")]
    NoConversionPath { from: Currency, to: Currency },

    /// A path step had neither its forward nor its reverse rate recorded
    /// at the time it was resolved.
    #[error("No conversion rate between {from} and {to}")]
    NoConversionRate { from: Currency, to: Currency },

    /// Rate source returned an error.
    #[error("Rate provider error: {0}")]
    ProviderError(String),
}

impl FxError {
    pub(crate) fn no_path(from: &Currency, to: &Currency) -> Self {
        Self::NoConversionPath {
            from: from.clone(),
            to: to.clone(),
        }
    }

    pub(crate) fn no_rate(from: &Currency, to: &Currency) -> Self {
        Self::NoConversionRate {
            from: from.clone(),
            to: to.clone(),
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
