//! Core types for fraud engine

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioral signals for one transaction
///
/// Built fresh by the caller for every evaluation. The default value is the
/// all-zero, all-false context used when a request omits every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// Amount of the transaction being scored
    pub transaction_amount: Decimal,

    /// Caller-supplied baseline for this user (zero when unknown)
    pub usual_amount: Decimal,

    /// Payment made from a device not seen before
    pub device_changed: bool,

    /// Payment made from an unfamiliar location
    pub location_changed: bool,

    /// Burst of transactions in a short window
    pub rapid_transactions: bool,
}

impl TransactionContext {
    /// Context with amounts only, all behavioral flags cleared
    pub fn with_amounts(transaction_amount: Decimal, usual_amount: Decimal) -> Self {
        Self {
            transaction_amount,
            usual_amount,
            ..Self::default()
        }
    }

    /// Reject amounts the permissive scorer would otherwise accept
    pub fn validate(&self) -> Result<()> {
        if self.transaction_amount < Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "transaction amount {} is negative",
                self.transaction_amount
            )));
        }
        if self.usual_amount < Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "usual amount {} is negative",
                self.usual_amount
            )));
        }
        Ok(())
    }
}

/// Fraud score (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    /// Upper bound of every score
    pub const MAX: RiskScore = RiskScore(100);

    /// Create new risk score, saturating at 100
    pub fn new(score: u8) -> Self {
        Self(score.min(100))
    }

    /// Clamp an accumulated rule total into range
    pub fn from_total(total: u32) -> Self {
        // total.min(100) always fits
        Self(total.min(100) as u8)
    }

    /// Get raw score
    pub fn score(&self) -> u8 {
        self.0
    }

    /// Check if high risk (61-100)
    pub fn is_high_risk(&self) -> bool {
        self.0 >= 61
    }

    /// Check if medium risk (31-60)
    pub fn is_medium_risk(&self) -> bool {
        (31..=60).contains(&self.0)
    }

    /// Check if low risk (0-30)
    pub fn is_low_risk(&self) -> bool {
        self.0 <= 30
    }
}

impl From<u8> for RiskScore {
    fn from(score: u8) -> Self {
        Self::new(score)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score 0-30
    Low,
    /// Score 31-60
    Medium,
    /// Score 61-100
    High,
}

impl RiskLevel {
    /// Every tier the classifier can produce
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Label used in API responses and stored records
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl From<RiskScore> for RiskLevel {
    fn from(score: RiskScore) -> Self {
        if score.is_high_risk() {
            RiskLevel::High
        } else if score.is_medium_risk() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    /// Clamped fraud score
    pub fraud_score: RiskScore,

    /// Tier derived from `fraud_score` alone
    pub risk_level: RiskLevel,

    /// Messages of the rules that fired, in rule table order
    pub explanations: Vec<String>,
}

impl ScoreResult {
    /// Explanations flattened into one string
    pub fn joined_explanation(&self, separator: &str) -> String {
        self.explanations.join(separator)
    }
}
