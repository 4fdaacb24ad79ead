//! Fraud scoring engine
//!
//! Deterministic risk scoring for a single payment transaction

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod rules;
pub mod scoring;

pub use error::{Error, Result};
pub use types::*;
pub use rules::{Rule, RuleSet};
pub use scoring::FraudScorer;
