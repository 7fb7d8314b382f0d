//! Budget routes with usage projections.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use kassenwart_core::budget::{CreateBudgetInput, UpdateBudgetInput};
use kassenwart_core::usage::DateRange;
use kassenwart_shared::BudgetId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/usage", get(all_budget_usage))
        .route(
            "/budgets/{id}",
            get(get_budget).patch(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/usage", get(budget_usage))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters of the budget list.
#[derive(Debug, Default, Deserialize)]
pub struct ListBudgetsQuery {
    /// Only budgets of this year.
    pub year: Option<i32>,
    /// Include archived budgets.
    #[serde(default)]
    pub include_archived: bool,
}

/// Query parameters of the all-budgets usage.
#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    /// Only budgets of this year.
    pub year: Option<i32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/budgets` - List budgets.
async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<ListBudgetsQuery>,
) -> impl IntoResponse {
    let budgets = state
        .store
        .budgets()
        .list(query.year, query.include_archived)
        .await;
    (StatusCode::OK, Json(json!({ "budgets": budgets })))
}

/// POST `/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    Json(input): Json<CreateBudgetInput>,
) -> impl IntoResponse {
    match state.store.budgets().create(input).await {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/budgets/{id}` - Fetch one budget.
async fn get_budget(State(state): State<AppState>, Path(id): Path<BudgetId>) -> impl IntoResponse {
    match state.store.budgets().get(id).await {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/budgets/{id}` - Update or archive a budget.
async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<BudgetId>,
    Json(input): Json<UpdateBudgetInput>,
) -> impl IntoResponse {
    match state.store.budgets().update(id, input).await {
        Ok(budget) => (StatusCode::OK, Json(budget)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/budgets/{id}` - Delete an unreferenced budget.
async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<BudgetId>,
) -> impl IntoResponse {
    match state.store.budgets().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/budgets/{id}/usage` - Usage, optionally within `from`/`to`.
async fn budget_usage(
    State(state): State<AppState>,
    Path(id): Path<BudgetId>,
    Query(range): Query<DateRange>,
) -> impl IntoResponse {
    match state.store.budgets().usage(id, range).await {
        Ok(usage) => (StatusCode::OK, Json(usage)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/budgets/usage` - Usage of every active budget.
async fn all_budget_usage(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> impl IntoResponse {
    let usage = state.store.budgets().all_usage(query.year).await;
    (StatusCode::OK, Json(json!({ "usage": usage })))
}
