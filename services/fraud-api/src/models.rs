use chrono::{DateTime, Utc};
use fraud_engine::{RiskLevel, ScoreResult, TransactionContext};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ===== Analysis =====
/// Direct analysis payload. Every field is optional and may be `null`:
/// amounts default to 0 and flags to false.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub transaction_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub usual_amount: Option<Decimal>,
    #[serde(default)]
    pub device_changed: Option<bool>,
    #[serde(default)]
    pub location_changed: Option<bool>,
    #[serde(default)]
    pub rapid_transactions: Option<bool>,
}

impl From<AnalyzeRequest> for TransactionContext {
    fn from(req: AnalyzeRequest) -> Self {
        TransactionContext {
            transaction_amount: req.transaction_amount.unwrap_or_default(),
            usual_amount: req.usual_amount.unwrap_or_default(),
            device_changed: req.device_changed.unwrap_or_default(),
            location_changed: req.location_changed.unwrap_or_default(),
            rapid_transactions: req.rapid_transactions.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub fraud_score: u8,
    pub risk_level: RiskLevel,
    pub explanation: Vec<String>,
}

impl From<ScoreResult> for AnalyzeResponse {
    fn from(result: ScoreResult) -> Self {
        AnalyzeResponse {
            fraud_score: result.fraud_score.score(),
            risk_level: result.risk_level,
            explanation: result.explanations,
        }
    }
}

// ===== Admin =====
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password required"))]
    pub password: String,
}

/// Stored administrator. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminAccount {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
}

impl From<&AdminAccount> for AdminSummary {
    fn from(admin: &AdminAccount) -> Self {
        AdminSummary {
            id: admin.id,
            username: admin.username.clone(),
            full_name: admin.full_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminSummary,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

// ===== Users =====
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Baseline used for amount anomaly detection; absent means 0
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub usual_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

// ===== Transactions =====
#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "userId and amount required"))]
    pub user_id: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

/// Persisted outcome of a simulated transaction
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction_id: Uuid,
    pub user_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub risk_level: RiskLevel,
    pub fraud_score: u8,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Separator used to flatten explanations into one column
    pub const EXPLANATION_SEPARATOR: &'static str = "; ";

    pub fn new(user_id: String, amount: Decimal, result: &ScoreResult) -> Self {
        TransactionRecord {
            transaction_id: Uuid::new_v4(),
            user_id,
            amount,
            risk_level: result.risk_level,
            fraud_score: result.fraud_score.score(),
            explanation: result.joined_explanation(Self::EXPLANATION_SEPARATOR),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: TransactionRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionRecord>,
}

// ===== Stats =====
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiskStats {
    pub total_transactions: u64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
}

impl RiskStats {
    pub fn record(&mut self, level: RiskLevel) {
        self.total_transactions += 1;
        match level {
            RiskLevel::High => self.high_risk_count += 1,
            RiskLevel::Medium => self.medium_risk_count += 1,
            RiskLevel::Low => self.low_risk_count += 1,
        }
    }
}

// ===== Health Check =====
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
