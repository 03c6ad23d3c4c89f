//! Registry configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a conversion whose source and target are the same currency is
/// answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfConversion {
    /// Run the normal search. It only ever finds the trivial one-vertex
    /// path, which is reported as `NoConversionPath`.
    #[default]
    Reject,
    /// Return the amount unchanged.
    Identity,
}

impl FromStr for SelfConversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "identity" => Ok(Self::Identity),
            other => Err(format!("Unknown self-conversion policy: {}", other)),
        }
    }
}

/// Configuration for the rate registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FxConfig {
    /// Policy for `from == to` conversions.
    pub self_conversion: SelfConversion,
    /// Longest path, in hops, a conversion may use. `None` is unbounded.
    pub max_hops: Option<usize>,
}

impl FxConfig {
    /// Load configuration from environment variables.
    ///
    /// `FX_SELF_CONVERSION` takes `reject` or `identity`; `FX_MAX_HOPS`
    /// takes a positive integer. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var("FX_SELF_CONVERSION") {
            if let Ok(policy) = policy.parse() {
                config.self_conversion = policy;
            }
        }

        if let Ok(hops) = std::env::var("FX_MAX_HOPS") {
            if let Ok(hops) = hops.trim().parse() {
                config.max_hops = Some(hops);
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_hops == Some(0) {
            return Err("Max hops must be at least 1".to_string());
        }

        Ok(())
    }

    /// Set the self-conversion policy.
    pub fn with_self_conversion(mut self, policy: SelfConversion) -> Self {
        self.self_conversion = policy;
        self
    }

    /// Limit conversion paths to `hops` legs.
    pub fn with_max_hops(mut self, hops: usize) -> Self {
        self.max_hops = Some(hops);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FxConfig::default();
        assert_eq!(config.self_conversion, SelfConversion::Reject);
        assert_eq!(config.max_hops, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = FxConfig::default().with_max_hops(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("identity".parse(), Ok(SelfConversion::Identity));
        assert_eq!(" Reject ".parse(), Ok(SelfConversion::Reject));
        assert!("sometimes".parse::<SelfConversion>().is_err());
    }
}
