use fraud_engine::ScoreResult;
use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    // Scoring metrics
    pub static ref EVALUATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("fraud_evaluations_total", "Total fraud evaluations"),
        &["source", "risk_level"]
    ).expect("metric can be created");

    pub static ref FRAUD_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("fraud_score_distribution", "Distribution of fraud scores")
            .buckets(vec![0.0, 30.0, 60.0, 100.0])
    ).expect("metric can be created");

    // Simulation metrics
    pub static ref TRANSACTIONS_STORED: IntCounter = IntCounter::new(
        "simulated_transactions_stored_total",
        "Total simulated transactions persisted"
    ).expect("metric can be created");

    // Admin metrics
    pub static ref LOGIN_ATTEMPTS: IntCounterVec = IntCounterVec::new(
        Opts::new("admin_login_attempts_total", "Admin login attempts"),
        &["outcome"]
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(EVALUATIONS_TOTAL.clone()))?;
    registry.register(Box::new(FRAUD_SCORE.clone()))?;
    registry.register(Box::new(TRANSACTIONS_STORED.clone()))?;
    registry.register(Box::new(LOGIN_ATTEMPTS.clone()))?;
    Ok(())
}

/// Count one evaluation by caller and tier
pub fn observe_evaluation(source: &str, result: &ScoreResult) {
    EVALUATIONS_TOTAL
        .with_label_values(&[source, result.risk_level.as_str()])
        .inc();
    FRAUD_SCORE.observe(f64::from(result.fraud_score.score()));
}

/// Generate metrics output in Prometheus text format
pub fn render(registry: &Registry) -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
