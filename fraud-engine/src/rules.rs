//! Fraud signal rule table

use crate::{Error, Result, TransactionContext};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;

/// Amount anomaly multiplier over the usual amount
const ANOMALY_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// One fraud signal: predicate, weight and explanation
#[derive(Clone, Copy)]
pub struct Rule {
    /// Rule identifier
    pub name: &'static str,

    /// Points added when the predicate holds (0-100)
    pub weight: u8,

    /// Explanation shown when the rule fires
    pub message: &'static str,

    /// Signal predicate
    pub predicate: fn(&TransactionContext) -> bool,
}

impl Rule {
    /// Create new rule
    pub const fn new(
        name: &'static str,
        weight: u8,
        message: &'static str,
        predicate: fn(&TransactionContext) -> bool,
    ) -> Self {
        Self {
            name,
            weight,
            message,
            predicate,
        }
    }

    /// Check whether the rule fires for the context
    pub fn matches(&self, ctx: &TransactionContext) -> bool {
        (self.predicate)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("message", &self.message)
            .finish()
    }
}

/// Amount anomaly: transaction amount above 3x the usual amount.
///
/// A zero baseline makes any positive amount anomalous. If 3x the baseline
/// falls outside `Decimal`, its sign decides: above the range no amount can
/// exceed it, below the range every amount does.
fn amount_anomaly(ctx: &TransactionContext) -> bool {
    match ctx.usual_amount.checked_mul(ANOMALY_MULTIPLIER) {
        Some(threshold) => ctx.transaction_amount > threshold,
        None => ctx.usual_amount.is_sign_negative(),
    }
}

fn device_change(ctx: &TransactionContext) -> bool {
    ctx.device_changed
}

fn location_change(ctx: &TransactionContext) -> bool {
    ctx.location_changed
}

fn velocity(ctx: &TransactionContext) -> bool {
    ctx.rapid_transactions
}

/// Built-in rules, in evaluation order
pub const STANDARD_RULES: [Rule; 4] = [
    Rule::new("amount_anomaly", 40, "Amount is much higher than usual", amount_anomaly),
    Rule::new("device_change", 30, "You are using a new device", device_change),
    Rule::new("location_change", 20, "You are in a new place", location_change),
    Rule::new("velocity", 25, "Many quick transactions happened", velocity),
];

/// Ordered, validated rule table
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule table, keeping the given order
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.weight > 100 {
                return Err(Error::InvalidConfig(format!(
                    "rule {} has weight {} outside 0-100",
                    rule.name, rule.weight
                )));
            }
            if !seen.insert(rule.name) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate rule name {}",
                    rule.name
                )));
            }
        }
        Ok(Self { rules })
    }

    /// The built-in four-signal table
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
        }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_table_order() {
        let names: Vec<_> = RuleSet::standard().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["amount_anomaly", "device_change", "location_change", "velocity"]
        );

        let weights: Vec<_> = STANDARD_RULES.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![40, 30, 20, 25]);
    }

    #[test]
    fn test_amount_anomaly_threshold() {
        let ctx = |amount, usual| TransactionContext::with_amounts(amount, usual);

        assert!(!amount_anomaly(&ctx(dec!(300), dec!(100))));
        assert!(amount_anomaly(&ctx(dec!(300.01), dec!(100))));
        assert!(!amount_anomaly(&ctx(dec!(100), dec!(1000))));
    }

    #[test]
    fn test_amount_anomaly_zero_baseline() {
        // Unseen users have no baseline: any positive amount trips the rule
        assert!(amount_anomaly(&TransactionContext::with_amounts(dec!(1), dec!(0))));
        assert!(amount_anomaly(&TransactionContext::with_amounts(dec!(0.01), dec!(0))));
        assert!(!amount_anomaly(&TransactionContext::with_amounts(dec!(0), dec!(0))));
    }

    #[test]
    fn test_amount_anomaly_negative_baseline_passes_through() {
        // 3 x -10 = -30, and 0 > -30
        assert!(amount_anomaly(&TransactionContext::with_amounts(dec!(0), dec!(-10))));
        assert!(!amount_anomaly(&TransactionContext::with_amounts(dec!(-50), dec!(-10))));
    }

    #[test]
    fn test_amount_anomaly_overflow_is_false() {
        let ctx = TransactionContext::with_amounts(Decimal::MAX, Decimal::MAX);
        assert!(!amount_anomaly(&ctx));
    }

    #[test]
    fn test_amount_anomaly_negative_overflow_is_true() {
        // 3 x MIN is below every representable amount
        assert!(amount_anomaly(&TransactionContext::with_amounts(Decimal::ZERO, Decimal::MIN)));
        assert!(amount_anomaly(&TransactionContext::with_amounts(Decimal::MIN, Decimal::MIN)));

        let usual = Decimal::from_i128_with_scale(-30_000_000_000_000_000_000_000_000_000, 0);
        assert!(amount_anomaly(&TransactionContext::with_amounts(dec!(100), usual)));
    }

    #[test]
    fn test_rule_set_rejects_bad_weight() {
        let rules = vec![Rule::new("too_heavy", 101, "x", device_change)];
        let err = RuleSet::new(rules).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rule_set_rejects_duplicate_names() {
        let rules = vec![
            Rule::new("device_change", 30, "a", device_change),
            Rule::new("device_change", 10, "b", device_change),
        ];
        assert!(RuleSet::new(rules).is_err());
    }
}
