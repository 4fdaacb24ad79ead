pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;

// Re-exports for convenience
pub use config::Config;
pub use errors::{ApiError, ApiResult};
pub use state::AppState;
pub use store::{InMemoryStore, TransactionStore};
