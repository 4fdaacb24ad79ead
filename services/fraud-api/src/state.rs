use fraud_engine::FraudScorer;
use prometheus::Registry;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::metrics;
use crate::store::TransactionStore;

/// Shared handles for every worker
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<FraudScorer>,
    pub store: Arc<dyn TransactionStore>,
    pub tokens: TokenService,
    pub reject_negative_amounts: bool,
    pub recent_limit: usize,
    pub registry: Registry,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn TransactionStore>,
    ) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        metrics::register_metrics(&registry)?;

        Ok(Self {
            scorer: Arc::new(FraudScorer::default()),
            store,
            tokens: TokenService::from_config(&config.auth),
            reject_negative_amounts: config.scoring.reject_negative_amounts,
            recent_limit: config.dashboard.recent_limit,
            registry,
        })
    }
}
