//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod bindings;
pub mod budgets;
pub mod cash_advances;
pub mod health;
pub mod vouchers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(vouchers::routes())
        .merge(budgets::routes())
        .merge(bindings::routes())
        .merge(cash_advances::routes())
}
