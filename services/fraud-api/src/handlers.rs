use actix_web::{web, HttpResponse};
use fraud_engine::{ScoreResult, TransactionContext};
use rust_decimal::Decimal;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{self, Claims, TokenService};
use crate::errors::{ApiError, ApiResult};
use crate::metrics;
use crate::middleware::JwtAuth;
use crate::models::*;
use crate::state::AppState;

/// Run the engine, honoring the strict-input switch
fn score(state: &AppState, ctx: &TransactionContext) -> ApiResult<ScoreResult> {
    if state.reject_negative_amounts {
        Ok(state.scorer.evaluate_checked(ctx)?)
    } else {
        Ok(state.scorer.evaluate(ctx))
    }
}

// ===== Root / Health =====
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Fraud Detection API Running")
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn metrics_endpoint(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let body = metrics::render(&state.registry).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

// ===== Analyze =====
/// Score a transaction-shaped payload. An empty or `null` body scores the
/// all-default context.
pub async fn analyze(body: web::Bytes, state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        AnalyzeRequest::default()
    } else {
        serde_json::from_slice::<Option<AnalyzeRequest>>(&body)
            .map_err(|e| ApiError::InvalidInput(format!("Malformed request body: {}", e)))?
            .unwrap_or_default()
    };

    let result = score(&state, &TransactionContext::from(request))?;
    metrics::observe_evaluation("analyze", &result);

    Ok(HttpResponse::Ok().json(AnalyzeResponse::from(result)))
}

// ===== Admin Login =====
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let request = req.into_inner();
    request.validate()?;

    let admin = match state.store.find_admin(&request.username)? {
        Some(admin) if auth::verify_password(&admin, &request.password) => admin,
        _ => {
            warn!("Failed login for {}", request.username);
            metrics::LOGIN_ATTEMPTS.with_label_values(&["rejected"]).inc();
            return Err(ApiError::InvalidCredentials);
        }
    };

    let (token, expires_at) = state.tokens.issue(&admin)?;
    metrics::LOGIN_ATTEMPTS.with_label_values(&["accepted"]).inc();
    info!("Admin {} logged in", admin.username);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        admin: AdminSummary::from(&admin),
        expires_at,
    }))
}

// ===== Dashboard =====
pub async fn list_transactions(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let transactions = state.store.recent_transactions(state.recent_limit)?;
    Ok(HttpResponse::Ok().json(TransactionsResponse { transactions }))
}

pub async fn list_users(
    query: web::Query<UsersQuery>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let filter = query.user_id.as_deref().filter(|id| !id.is_empty());
    let users = state.store.list_users(filter)?;
    Ok(HttpResponse::Ok().json(UsersResponse { users }))
}

pub async fn get_stats(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let stats = state.store.risk_stats()?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Score an amount against the user's stored baseline and persist the result
pub async fn simulate_transaction(
    req: web::Json<SimulateRequest>,
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let request = req.into_inner();
    request.validate()?;

    let amount = match request.amount {
        Some(amount) if !amount.is_zero() => amount,
        _ => return Err(ApiError::InvalidInput("userId and amount required".to_string())),
    };

    let user = state
        .store
        .find_user(&request.user_id)?
        .ok_or_else(|| ApiError::UserNotFound(request.user_id.clone()))?;

    let ctx = TransactionContext::with_amounts(amount, user.usual_amount.unwrap_or(Decimal::ZERO));
    let result = score(&state, &ctx)?;
    metrics::observe_evaluation("simulation", &result);

    let record = TransactionRecord::new(user.user_id, amount, &result);
    let transaction = state.store.insert_transaction(record)?;
    metrics::TRANSACTIONS_STORED.inc();

    info!(
        "Simulated transaction {} for {} by {}: score {} ({})",
        transaction.transaction_id,
        transaction.user_id,
        claims.username,
        transaction.fraud_score,
        transaction.risk_level
    );

    Ok(HttpResponse::Ok().json(TransactionResponse { transaction }))
}

// ===== Configure Routes =====
/// Body errors surface as `INVALID_INPUT` instead of actix's plain text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, tokens: TokenService) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/analyze", web::post().to(analyze))
        .service(web::scope("/admin").route("/login", web::post().to(login)))
        .service(
            web::scope("/dashboard")
                .wrap(JwtAuth::new(tokens))
                .route("/transactions", web::get().to(list_transactions))
                .route("/users", web::get().to(list_users))
                .route("/stats", web::get().to(get_stats))
                .route(
                    "/simulate-transaction",
                    web::post().to(simulate_transaction),
                ),
        );
}
