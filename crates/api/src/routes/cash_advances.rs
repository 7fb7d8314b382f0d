//! Cash advance routes.
//!
//! Partials are addressed by their own id once created, so settling and
//! deleting them does not need the owning advance in the path.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use kassenwart_core::cash_advance::{
    AddPartialInput, CashAdvanceFilter, CreateCashAdvanceInput, ResolveInput, SettlePartialInput,
    UpdateCashAdvanceInput,
};
use kassenwart_shared::{CashAdvanceId, PartialId};
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the cash advance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cash-advances",
            get(list_cash_advances).post(create_cash_advance),
        )
        .route(
            "/cash-advances/{id}",
            get(get_cash_advance)
                .patch(update_cash_advance)
                .delete(delete_cash_advance),
        )
        .route("/cash-advances/{id}/resolve", post(resolve_cash_advance))
        .route("/cash-advances/{id}/partials", post(add_partial))
        .route("/cash-advances/partials/{pid}/settle", post(settle_partial))
        .route("/cash-advances/partials/{pid}", delete(delete_partial))
}

// ============================================================================
// Advances
// ============================================================================

/// GET `/cash-advances` - List advances, newest first.
async fn list_cash_advances(
    State(state): State<AppState>,
    Query(filter): Query<CashAdvanceFilter>,
) -> impl IntoResponse {
    let advances = state.store.cash_advances().list(&filter).await;
    (StatusCode::OK, Json(json!({ "cash_advances": advances })))
}

/// POST `/cash-advances` - Open a new advance.
async fn create_cash_advance(
    State(state): State<AppState>,
    Json(input): Json<CreateCashAdvanceInput>,
) -> impl IntoResponse {
    match state.store.cash_advances().create(input).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/cash-advances/{id}` - Advance with partials, status and totals.
async fn get_cash_advance(
    State(state): State<AppState>,
    Path(id): Path<CashAdvanceId>,
) -> impl IntoResponse {
    match state.store.cash_advances().get(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_cash_advance(
    State(state): State<AppState>,
    Path(id): Path<CashAdvanceId>,
    Json(input): Json<UpdateCashAdvanceInput>,
) -> impl IntoResponse {
    match state.store.cash_advances().update(id, input).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_cash_advance(
    State(state): State<AppState>,
    Path(id): Path<CashAdvanceId>,
) -> impl IntoResponse {
    match state.store.cash_advances().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/cash-advances/{id}/resolve` - Close the advance for good.
async fn resolve_cash_advance(
    State(state): State<AppState>,
    Path(id): Path<CashAdvanceId>,
    Json(input): Json<ResolveInput>,
) -> impl IntoResponse {
    match state.store.cash_advances().resolve(id, input).await {
        Ok(resolution) => (StatusCode::OK, Json(resolution)).into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Partials
// ============================================================================

/// POST `/cash-advances/{id}/partials` - Issue a partial to a recipient.
async fn add_partial(
    State(state): State<AppState>,
    Path(id): Path<CashAdvanceId>,
    Json(input): Json<AddPartialInput>,
) -> impl IntoResponse {
    match state.store.cash_advances().add_partial(id, input).await {
        Ok(written) => (StatusCode::CREATED, Json(written)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST `/cash-advances/partials/{pid}/settle` - Record what was spent.
async fn settle_partial(
    State(state): State<AppState>,
    Path(pid): Path<PartialId>,
    Json(input): Json<SettlePartialInput>,
) -> impl IntoResponse {
    match state.store.cash_advances().settle_partial(pid, input).await {
        Ok(partial) => (StatusCode::OK, Json(partial)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/cash-advances/partials/{pid}`
async fn delete_partial(
    State(state): State<AppState>,
    Path(pid): Path<PartialId>,
) -> impl IntoResponse {
    match state.store.cash_advances().delete_partial(pid).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    async fn open_advance(app: &axum::Router) {
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/cash-advances",
            Some(json!({
                "order_no": "BV-2025-01",
                "holder_name": "Kassenwart",
                "purpose": "Sommerfest",
                "total_amount": "1000.00"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_resolve_with_counter_voucher() {
        let (app, _) = app();
        open_advance(&app).await;

        let (status, written) = send(
            &app,
            "POST",
            "/api/v1/cash-advances/1/partials",
            Some(json!({ "recipient_name": "Gruppe A", "planned_amount": "800.00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let pid = &written["partial"]["id"];

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/cash-advances/1/resolve",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, partial) = send(
            &app,
            "POST",
            &format!("/api/v1/cash-advances/partials/{pid}/settle"),
            Some(json!({ "settled_amount": "800.00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(partial["is_settled"], true);

        let (status, resolution) = send(
            &app,
            "POST",
            "/api/v1/cash-advances/1/resolve",
            Some(json!({ "create_counter_voucher": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resolution["difference"], "200.00");
        assert_eq!(resolution["advance"]["status"], "RESOLVED");
        assert_eq!(resolution["counter_voucher"]["voucher_type"], "IN");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/cash-advances/1/resolve",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (app, _) = app();
        open_advance(&app).await;

        let (status, body) = send(&app, "GET", "/api/v1/cash-advances?status=OPEN", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cash_advances"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["cash_advances"][0]["totals"]["actual_remaining"], "1000.00");

        let (_, body) = send(&app, "GET", "/api/v1/cash-advances?status=RESOLVED", None).await;
        assert_eq!(body["cash_advances"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_unknown_partial_is_404() {
        let (app, _) = app();
        let (status, _) = send(&app, "DELETE", "/api/v1/cash-advances/partials/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
