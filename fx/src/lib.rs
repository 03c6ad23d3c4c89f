//! RateMesh FX Registry
//!
//! In-process registry of exchange rates that converts between any two
//! currencies connected by a chain of recorded rates.
//!
//! # Features
//!
//! - Concurrent rate table keyed by directed currency pair
//! - Every recorded rate is also usable in reverse via its reciprocal
//! - Fewest-hop path search across intermediate currencies
//! - Pull-based refresh from pluggable rate sources
//!
//! # Example
//!
//! ```rust
//! use ratemesh_common::Currency;
//! use ratemesh_fx::RateRegistry;
//!
//! let registry = RateRegistry::new();
//! registry.update([("USD", "CAD", 1.34), ("USD", "EUR", 0.86)]);
//!
//! // CAD -> USD uses the inverse of USD/CAD, then USD -> EUR.
//! let eur = registry.convert(&Currency::cad(), &Currency::eur(), 10.0).unwrap();
//! assert!((eur - 6.418).abs() < 0.001);
//! ```

pub mod registry;
pub mod graph;
pub mod conversion;
pub mod converter;
pub mod provider;
pub mod config;
pub mod error;

pub use registry::{RateRegistry, RegistryStats, SharedRateRegistry};
pub use graph::RateGraph;
pub use conversion::{Conversion, ConversionLeg, ConversionPath};
pub use converter::CurrencyConverter;
#[cfg(any(test, feature = "test-utils"))]
pub use converter::MockCurrencyConverter;
pub use provider::{RateSource, StaticRateSource};
pub use config::{FxConfig, SelfConversion};
pub use error::{FxError, FxResult};
