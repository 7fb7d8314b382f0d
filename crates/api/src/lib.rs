//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for vouchers, budgets, earmarks and cash advances
//! - JSON error responses derived from [`kassenwart_shared::AppError`]

pub mod error;
pub mod routes;

use axum::Router;
use kassenwart_store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Ledger store.
    pub store: Store,
}

impl AppState {
    /// Creates the state around a store.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
