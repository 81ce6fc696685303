// handlers/mod.rs - route table and shared request state
//
// Public routes: GET / and GET /health
// Media routes:  POST /deleteMedia

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::accounts::AccountTable;
use crate::services::{DeletionRelay, MediaApi};

pub mod media;
pub mod public;

/// State handed to every handler. Cloning is cheap; everything inside is
/// shared and read-only.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountTable>,
    pub relay: DeletionRelay,
}

impl AppState {
    pub fn new(accounts: Arc<AccountTable>, media: Arc<dyn MediaApi>) -> Self {
        let relay = DeletionRelay::new(accounts.clone(), media);
        Self { accounts, relay }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Media
        .route("/deleteMedia", post(media::delete_media))
        .with_state(state)
}
