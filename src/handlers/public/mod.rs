// handlers/public/mod.rs - liveness and readiness endpoints

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use super::AppState;

/// GET / - plain-text liveness message
pub async fn root() -> &'static str {
    concat!("media-relay ", env!("CARGO_PKG_VERSION"), " is running")
}

/// GET /health - readiness with a summary of loaded accounts (never credentials)
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "accounts": state.accounts.len(),
        "default_account": state.accounts.default_account().is_some(),
    }))
}
