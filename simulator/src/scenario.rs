//! Simulation scenarios.

use std::path::Path;

use anyhow::Context;
use ratemesh_common::RateQuote;
use ratemesh_fx::{FxError, FxResult};
use serde::{Deserialize, Serialize};

/// A scripted sequence of registry operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Steps in the scenario.
    pub steps: Vec<ScenarioStep>,
}

/// A step in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Empty the registry.
    Clear,
    /// Apply a batch of rates.
    Update { rates: Vec<RateQuote> },
    /// Request a conversion and check the outcome.
    Convert {
        from: String,
        to: String,
        amount: f64,
        expect: Expectation,
    },
    /// Pause.
    Wait { millis: u64 },
}

/// Expected outcome of a conversion step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expectation {
    /// Succeeds with a value within `tolerance` of `value`.
    Amount { value: f64, tolerance: f64 },
    /// Fails with `NoConversionPath`.
    NoPath,
    /// Any outcome is accepted.
    Any,
}

impl Expectation {
    /// Exact-ish amount with the default 0.001 tolerance.
    pub fn amount(value: f64) -> Self {
        Self::Amount {
            value,
            tolerance: 0.001,
        }
    }

    /// Check a conversion outcome.
    pub fn check(&self, result: &FxResult<f64>) -> Result<(), String> {
        match (self, result) {
            (Self::Any, _) => Ok(()),
            (Self::Amount { value, tolerance }, Ok(actual)) => {
                if (actual - value).abs() <= *tolerance {
                    Ok(())
                } else {
                    Err(format!("expected {} (+/-{}), got {}", value, tolerance, actual))
                }
            }
            (Self::Amount { value, .. }, Err(e)) => {
                Err(format!("expected {}, got error: {}", value, e))
            }
            (Self::NoPath, Err(FxError::NoConversionPath { .. })) => Ok(()),
            (Self::NoPath, Ok(actual)) => Err(format!("expected no path, got {}", actual)),
            (Self::NoPath, Err(e)) => Err(format!("expected no path, got error: {}", e)),
        }
    }
}

impl Scenario {
    /// Load a built-in scenario by name, or a JSON scenario file.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "cross-rates" => Ok(Self::cross_rates()),
            "reset" => Ok(Self::reset()),
            "self-conversion" => Ok(Self::self_conversion()),
            path if path.ends_with(".json") => Self::from_file(Path::new(path)),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Read a scenario from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    fn seed_step() -> ScenarioStep {
        ScenarioStep::Update {
            rates: crate::seed::default_quotes(),
        }
    }

    fn convert(from: &str, to: &str, amount: f64, expect: Expectation) -> ScenarioStep {
        ScenarioStep::Convert {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            expect,
        }
    }

    /// Direct, inverse-chained and unknown-currency conversions.
    fn cross_rates() -> Self {
        Self {
            name: "cross-rates".to_string(),
            description: "Direct and multi-hop conversions over the seed rates".to_string(),
            steps: vec![
                ScenarioStep::Clear,
                Self::seed_step(),
                Self::convert("USD", "EUR", 10.0, Expectation::amount(8.6)),
                Self::convert("CAD", "EUR", 10.0, Expectation::amount(6.418)),
                Self::convert("JPY", "CAD", 10.0, Expectation::NoPath),
                Self::convert("CAD", "JPY", 10.0, Expectation::NoPath),
                ScenarioStep::Clear,
                ScenarioStep::Update {
                    rates: vec![RateQuote::new("USD", "CAD", 2.0)],
                },
                Self::convert("CAD", "USD", 10.0, Expectation::amount(5.0)),
            ],
        }
    }

    /// Repeated clears followed by overwrites.
    fn reset() -> Self {
        Self {
            name: "reset".to_string(),
            description: "Idempotent clear and last-write-wins updates".to_string(),
            steps: vec![
                Self::seed_step(),
                ScenarioStep::Clear,
                ScenarioStep::Clear,
                Self::convert("USD", "EUR", 10.0, Expectation::NoPath),
                ScenarioStep::Update {
                    rates: vec![
                        RateQuote::new("USD", "EUR", 0.80),
                        RateQuote::new("USD", "EUR", 0.90),
                    ],
                },
                Self::convert("USD", "EUR", 10.0, Expectation::amount(9.0)),
                Self::convert("USD", "CAD", 10.0, Expectation::NoPath),
            ],
        }
    }

    /// Same-currency conversions under the default policy.
    fn self_conversion() -> Self {
        Self {
            name: "self-conversion".to_string(),
            description: "Same-currency conversions have no path".to_string(),
            steps: vec![
                ScenarioStep::Clear,
                Self::seed_step(),
                Self::convert("USD", "USD", 10.0, Expectation::NoPath),
                Self::convert("JPY", "JPY", 10.0, Expectation::NoPath),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratemesh_common::Currency;

    #[test]
    fn test_load_builtin() {
        assert_eq!(Scenario::load("cross-rates").unwrap().steps.len(), 9);
        assert!(Scenario::load("reset").is_ok());
        assert!(Scenario::load("nope").is_err());
    }

    #[test]
    fn test_expectation_check() {
        let no_path: FxResult<f64> = Err(FxError::NoConversionPath {
            from: Currency::jpy(),
            to: Currency::cad(),
        });

        assert!(Expectation::amount(8.6).check(&Ok(8.6004)).is_ok());
        assert!(Expectation::amount(8.6).check(&Ok(8.7)).is_err());
        assert!(Expectation::amount(8.6).check(&no_path).is_err());
        assert!(Expectation::NoPath.check(&no_path).is_ok());
        assert!(Expectation::NoPath.check(&Ok(1.0)).is_err());
        assert!(Expectation::Any.check(&no_path).is_ok());
    }

    #[test]
    fn test_scenario_json_round_trip() {
        let json = serde_json::to_string(&Scenario::load("reset").unwrap()).unwrap();
        let scenario: Scenario = serde_json::from_str(&json).unwrap();

        assert_eq!(scenario.name, "reset");
        assert!(matches!(scenario.steps[1], ScenarioStep::Clear));
    }
}
