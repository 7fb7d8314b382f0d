//! Earmark routes, served under `/bindings`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use kassenwart_core::earmark::{CreateEarmarkInput, UpdateEarmarkInput};
use kassenwart_shared::EarmarkId;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the earmark routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bindings", get(list_earmarks).post(create_earmark))
        .route(
            "/bindings/{id}",
            get(get_earmark).patch(update_earmark).delete(delete_earmark),
        )
        .route("/bindings/{id}/usage", get(earmark_usage))
}

/// Query parameters of the earmark list.
#[derive(Debug, Default, Deserialize)]
pub struct ListEarmarksQuery {
    /// Include archived earmarks.
    #[serde(default)]
    pub include_archived: bool,
}

async fn list_earmarks(
    State(state): State<AppState>,
    Query(query): Query<ListEarmarksQuery>,
) -> impl IntoResponse {
    let earmarks = state.store.earmarks().list(query.include_archived).await;
    (StatusCode::OK, Json(json!({ "bindings": earmarks })))
}

async fn create_earmark(
    State(state): State<AppState>,
    Json(input): Json<CreateEarmarkInput>,
) -> impl IntoResponse {
    match state.store.earmarks().create(input).await {
        Ok(earmark) => (StatusCode::CREATED, Json(earmark)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_earmark(
    State(state): State<AppState>,
    Path(id): Path<EarmarkId>,
) -> impl IntoResponse {
    match state.store.earmarks().get(id).await {
        Ok(earmark) => (StatusCode::OK, Json(earmark)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_earmark(
    State(state): State<AppState>,
    Path(id): Path<EarmarkId>,
    Json(input): Json<UpdateEarmarkInput>,
) -> impl IntoResponse {
    match state.store.earmarks().update(id, input).await {
        Ok(earmark) => (StatusCode::OK, Json(earmark)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_earmark(
    State(state): State<AppState>,
    Path(id): Path<EarmarkId>,
) -> impl IntoResponse {
    match state.store.earmarks().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/bindings/{id}/usage` - Budget vs. allocations of one earmark.
async fn earmark_usage(
    State(state): State<AppState>,
    Path(id): Path<EarmarkId>,
) -> impl IntoResponse {
    match state.store.earmarks().usage(id).await {
        Ok(usage) => (StatusCode::OK, Json(usage)).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_earmark_usage_and_duplicate_code() {
        let (app, _) = app();
        let input = json!({ "code": "ZB-01", "name": "Spende Orgel", "budget_amount": "500.00" });
        let (status, _) = send(&app, "POST", "/api/v1/bindings", Some(input.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/api/v1/bindings", Some(input)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].is_string());

        send(
            &app,
            "POST",
            "/api/v1/vouchers",
            Some(json!({
                "type": "OUT",
                "date": "2025-02-01",
                "classification": { "sphere": "IDEELL" },
                "payment_method": "BAR",
                "amount": { "mode": "GROSS", "gross": "120.00" },
                "earmarks": [{ "earmark_id": 1, "amount": "120.00" }]
            })),
        )
        .await;

        let (status, usage) = send(&app, "GET", "/api/v1/bindings/1/usage", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usage["allocated"], "120.00");
        assert_eq!(usage["remaining"], "380.00");
        assert_eq!(usage["balance"], "-120.00");
    }
}
