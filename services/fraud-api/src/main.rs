use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use fraud_api::{config::Config, handlers, AppState, InMemoryStore, TransactionStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    info!("Starting Fraud Detection API...");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let store: Arc<dyn TransactionStore> = Arc::new(InMemoryStore::seeded(
        config.users.clone(),
        config.admins.clone(),
    ));
    let state = AppState::new(&config, store).context("Failed to register metrics")?;

    if state.reject_negative_amounts {
        info!("Negative amounts will be rejected with INVALID_INPUT");
    }

    let server_config = config.server.clone();

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        let tokens = state.tokens.clone();
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .configure(move |cfg| handlers::configure_routes(cfg, tokens))
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await?;

    Ok(())
}
