//! Fraud scoring engine

use crate::{Result, RiskLevel, RiskScore, RuleSet, ScoreResult, TransactionContext};
use tracing::debug;

/// Fraud scorer
///
/// Stateless apart from its immutable rule table, so one instance can be
/// shared across any number of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct FraudScorer {
    rules: RuleSet,
}

impl FraudScorer {
    /// Create new scorer over a rule table
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Rule table in use
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Score a transaction.
    ///
    /// Every rule is evaluated in table order; weights of firing rules are
    /// summed and the total saturates at 100. Amounts are taken as given,
    /// negative values included.
    pub fn evaluate(&self, ctx: &TransactionContext) -> ScoreResult {
        let mut total: u32 = 0;
        let mut explanations = Vec::new();

        for rule in self.rules.rules() {
            if rule.matches(ctx) {
                total = total.saturating_add(u32::from(rule.weight));
                explanations.push(rule.message.to_string());
            }
        }

        let fraud_score = RiskScore::from_total(total);
        let risk_level = RiskLevel::from(fraud_score);

        debug!(
            raw_total = total,
            score = fraud_score.score(),
            risk_level = %risk_level,
            fired = explanations.len(),
            "Transaction scored"
        );

        ScoreResult {
            fraud_score,
            risk_level,
            explanations,
        }
    }

    /// Score a transaction after rejecting negative amounts
    pub fn evaluate_checked(&self, ctx: &TransactionContext) -> Result<ScoreResult> {
        ctx.validate()?;
        Ok(self.evaluate(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Rule};
    use rust_decimal_macros::dec;

    fn context(
        amount: rust_decimal::Decimal,
        usual: rust_decimal::Decimal,
        device: bool,
        location: bool,
        rapid: bool,
    ) -> TransactionContext {
        TransactionContext {
            transaction_amount: amount,
            usual_amount: usual,
            device_changed: device,
            location_changed: location,
            rapid_transactions: rapid,
        }
    }

    #[test]
    fn test_no_signals() {
        let result = FraudScorer::default().evaluate(&context(dec!(100), dec!(1000), false, false, false));

        assert_eq!(result.fraud_score.score(), 0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.explanations.is_empty());
    }

    #[test]
    fn test_amount_anomaly_only() {
        let result = FraudScorer::default().evaluate(&context(dec!(5000), dec!(1000), false, false, false));

        assert_eq!(result.fraud_score.score(), 40);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.explanations, vec!["Amount is much higher than usual"]);
    }

    #[test]
    fn test_device_and_location() {
        let result = FraudScorer::default().evaluate(&context(dec!(100), dec!(100), true, true, false));

        assert_eq!(result.fraud_score.score(), 50);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(
            result.explanations,
            vec!["You are using a new device", "You are in a new place"]
        );
    }

    #[test]
    fn test_all_signals_clamped() {
        let result = FraudScorer::default().evaluate(&context(dec!(5000), dec!(1000), true, true, true));

        assert_eq!(result.fraud_score, RiskScore::MAX);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.explanations,
            vec![
                "Amount is much higher than usual",
                "You are using a new device",
                "You are in a new place",
                "Many quick transactions happened",
            ]
        );
    }

    #[test]
    fn test_zero_baseline_trips_anomaly() {
        let result = FraudScorer::default().evaluate(&context(dec!(1), dec!(0), false, false, false));

        assert_eq!(result.fraud_score.score(), 40);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_location_and_velocity_is_medium() {
        // 20 + 25 = 45
        let result = FraudScorer::default().evaluate(&context(dec!(10), dec!(10), false, true, true));

        assert_eq!(result.fraud_score.score(), 45);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(
            result.explanations,
            vec!["You are in a new place", "Many quick transactions happened"]
        );
    }

    #[test]
    fn test_explanations_follow_table_not_weight() {
        // velocity (25) outweighs location (20) but still comes after it
        let result = FraudScorer::default().evaluate(&context(dec!(0), dec!(0), false, true, true));
        assert_eq!(result.explanations[0], "You are in a new place");
    }

    #[test]
    fn test_negative_amounts_are_scored() {
        let ctx = context(dec!(-5), dec!(-10), false, false, false);
        let result = FraudScorer::default().evaluate(&ctx);

        // -5 > -30
        assert_eq!(result.fraud_score.score(), 40);
    }

    #[test]
    fn test_negative_baseline_beyond_range_trips_anomaly() {
        let ctx = context(rust_decimal::Decimal::ZERO, rust_decimal::Decimal::MIN, false, false, false);
        let result = FraudScorer::default().evaluate(&ctx);

        assert_eq!(result.fraud_score.score(), 40);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(result.explanations, vec!["Amount is much higher than usual"]);
    }

    #[test]
    fn test_large_rule_table_saturates() {
        let rules = (0..500)
            .map(|i| {
                let name: &'static str = Box::leak(format!("always_{}", i).into_boxed_str());
                Rule::new(name, 100, "Always", |_| true)
            })
            .collect();
        let scorer = FraudScorer::new(RuleSet::new(rules).unwrap());

        let result = scorer.evaluate(&TransactionContext::default());
        assert_eq!(result.fraud_score, RiskScore::MAX);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.explanations.len(), 500);
    }

    #[test]
    fn test_evaluate_checked_rejects_negative() {
        let scorer = FraudScorer::default();

        let err = scorer
            .evaluate_checked(&context(dec!(-5), dec!(10), false, false, false))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let ok = scorer
            .evaluate_checked(&context(dec!(5000), dec!(1000), false, false, false))
            .unwrap();
        assert_eq!(ok.fraud_score.score(), 40);
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = RuleSet::new(vec![Rule::new(
            "device_only",
            70,
            "Device",
            |ctx| ctx.device_changed,
        )])
        .unwrap();
        let scorer = FraudScorer::new(rules);

        let result = scorer.evaluate(&context(dec!(1), dec!(0), true, false, false));
        assert_eq!(result.fraud_score.score(), 70);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.explanations, vec!["Device"]);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let scorer = FraudScorer::default();
        let ctx = context(dec!(900), dec!(100), true, false, true);

        assert_eq!(scorer.evaluate(&ctx), scorer.evaluate(&ctx));
    }
}
