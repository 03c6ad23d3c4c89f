//! RateMesh Common Types
//!
//! Shared value types used across RateMesh crates: currency codes,
//! directed currency pairs and rate quotes.

pub mod currency;
pub mod rate;
pub mod error;

pub use currency::*;
pub use rate::*;
pub use error::*;
