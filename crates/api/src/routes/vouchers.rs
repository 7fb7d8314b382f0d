//! Voucher routes: the ledger's create, update, delete and query boundary.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use kassenwart_core::voucher::{
    PaymentMethod, SortDirection, SortField, Sphere, VoucherDraft, VoucherFilter, VoucherPatch,
    VoucherReference, VoucherSort, VoucherType, VoucherWarning,
};
use kassenwart_shared::{BudgetId, CategoryId, EarmarkId, PageRequest, TermId, VoucherId};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vouchers", get(list_vouchers).post(create_voucher))
        .route(
            "/vouchers/{id}",
            get(get_voucher).patch(update_voucher).delete(delete_voucher),
        )
        .route(
            "/vouchers/{id}/references",
            post(link_reference).delete(unlink_reference),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a created voucher.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoucherResponse {
    /// Assigned id.
    pub id: VoucherId,
    /// Assigned number, `YYYY-NNNNN`.
    pub voucher_no: String,
    /// Non-blocking warnings.
    pub warnings: Vec<VoucherWarning>,
}

/// Response for an updated voucher.
#[derive(Debug, Serialize)]
pub struct UpdateVoucherResponse {
    /// Non-blocking warnings.
    pub warnings: Vec<VoucherWarning>,
}

/// Query parameters of the voucher list.
#[derive(Debug, Default, Deserialize)]
pub struct ListVouchersQuery {
    /// Earliest date.
    pub from: Option<NaiveDate>,
    /// Latest date.
    pub to: Option<NaiveDate>,
    /// Direction.
    #[serde(rename = "type")]
    pub voucher_type: Option<VoucherType>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Sphere.
    pub sphere: Option<Sphere>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Earmark.
    pub earmark_id: Option<EarmarkId>,
    /// Budget.
    pub budget_id: Option<BudgetId>,
    /// Tag.
    pub tag: Option<String>,
    /// Taxonomy term.
    pub term_id: Option<TermId>,
    /// Free text.
    pub q: Option<String>,
    /// Sort column.
    pub sort: Option<SortField>,
    /// Sort direction.
    pub direction: Option<SortDirection>,
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

impl ListVouchersQuery {
    fn into_parts(self) -> (VoucherFilter, VoucherSort, PageRequest) {
        let page = PageRequest::default();
        (
            VoucherFilter {
                from: self.from,
                to: self.to,
                voucher_type: self.voucher_type,
                payment_method: self.payment_method,
                sphere: self.sphere,
                category_id: self.category_id,
                earmark_id: self.earmark_id,
                budget_id: self.budget_id,
                tag: self.tag,
                term_id: self.term_id,
                q: self.q,
            },
            VoucherSort {
                field: self.sort.unwrap_or_default(),
                direction: self.direction.unwrap_or_default(),
            },
            PageRequest::new(
                self.offset.unwrap_or(page.offset),
                self.limit.unwrap_or(page.limit),
            ),
        )
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/vouchers` - Validate and store a voucher.
async fn create_voucher(
    State(state): State<AppState>,
    Json(draft): Json<VoucherDraft>,
) -> impl IntoResponse {
    match state.store.vouchers().create(&draft).await {
        Ok(written) => (
            StatusCode::CREATED,
            Json(CreateVoucherResponse {
                id: written.voucher.id,
                voucher_no: written.voucher.voucher_no,
                warnings: written.warnings,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH `/vouchers/{id}` - Apply a partial update.
async fn update_voucher(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
    Json(patch): Json<VoucherPatch>,
) -> impl IntoResponse {
    match state.store.vouchers().update(id, &patch).await {
        Ok(written) => (
            StatusCode::OK,
            Json(UpdateVoucherResponse {
                warnings: written.warnings,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE `/vouchers/{id}` - Delete an unreferenced voucher.
async fn delete_voucher(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
) -> impl IntoResponse {
    match state.store.vouchers().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/vouchers/{id}` - Fetch one voucher.
async fn get_voucher(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
) -> impl IntoResponse {
    match state.store.vouchers().get(id).await {
        Ok(voucher) => (StatusCode::OK, Json(voucher)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET `/vouchers` - Filtered, sorted, paginated list.
async fn list_vouchers(
    State(state): State<AppState>,
    Query(query): Query<ListVouchersQuery>,
) -> impl IntoResponse {
    let (filter, sort, page) = query.into_parts();
    let result = state.store.vouchers().list(&filter, sort, page).await;
    (StatusCode::OK, Json(result))
}

/// POST `/vouchers/{id}/references` - Register a dependent record.
async fn link_reference(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
    Json(reference): Json<VoucherReference>,
) -> impl IntoResponse {
    let repo = state.store.vouchers();
    if let Err(e) = repo.link_reference(id, reference).await {
        return error_response(e);
    }
    let references = repo.references(id).await;
    (StatusCode::OK, Json(json!({ "references": references }))).into_response()
}

/// DELETE `/vouchers/{id}/references` - Remove a dependent record.
async fn unlink_reference(
    State(state): State<AppState>,
    Path(id): Path<VoucherId>,
    Json(reference): Json<VoucherReference>,
) -> impl IntoResponse {
    match state.store.vouchers().unlink_reference(id, reference).await {
        Ok(removed) => (StatusCode::OK, Json(json!({ "removed": removed }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    fn expense(gross: &str) -> serde_json::Value {
        json!({
            "type": "OUT",
            "date": "2025-03-01",
            "classification": { "sphere": "ZWECK" },
            "payment_method": "BAR",
            "amount": { "mode": "GROSS", "gross": gross },
            "description": "Material"
        })
    }

    #[tokio::test]
    async fn test_create_returns_number_and_warnings() {
        let (app, _) = app();
        let (status, body) = send(&app, "POST", "/api/v1/vouchers", Some(expense("50.00"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["voucherNo"], "2025-00001");
        assert_eq!(body["id"], 1);
        assert_eq!(body["warnings"], json!([]));
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let (app, _) = app();
        let (status, body) = send(&app, "POST", "/api/v1/vouchers", Some(expense("0"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_oversized_amount_maps_to_400() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/vouchers",
            Some(expense("79228162514264337593543950335")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "AMOUNT_OUT_OF_RANGE");
    }

    #[tokio::test]
    async fn test_stale_version_maps_to_409() {
        let (app, _) = app();
        send(&app, "POST", "/api/v1/vouchers", Some(expense("50.00"))).await;

        let patch = json!({ "expected_version": 1, "description": "Neu" });
        let (status, _) = send(&app, "PATCH", "/api/v1/vouchers/1", Some(patch.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "PATCH", "/api/v1/vouchers/1", Some(patch)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_with_filter_and_page() {
        let (app, _) = app();
        for gross in ["10.00", "20.00", "30.00"] {
            send(&app, "POST", "/api/v1/vouchers", Some(expense(gross))).await;
        }

        let (status, body) = send(
            &app,
            "GET",
            "/api/v1/vouchers?type=OUT&sort=gross&direction=asc&limit=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["rows"][0]["amounts"]["gross_amount"], "10.00");

        let (_, body) = send(&app, "GET", "/api/v1/vouchers?type=IN", None).await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_reference_blocks_delete() {
        let (app, _) = app();
        send(&app, "POST", "/api/v1/vouchers", Some(expense("50.00"))).await;
        let reference = json!({ "invoice": 7 });

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/vouchers/1/references",
            Some(reference.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["references"], json!([{ "invoice": 7 }]));

        let (status, _) = send(&app, "DELETE", "/api/v1/vouchers/1", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(
            &app,
            "DELETE",
            "/api/v1/vouchers/1/references",
            Some(reference),
        )
        .await;
        assert_eq!(body["removed"], true);

        let (status, _) = send(&app, "DELETE", "/api/v1/vouchers/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/api/v1/vouchers/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cash_advance_reference_maps_to_422() {
        let (app, _) = app();
        send(&app, "POST", "/api/v1/vouchers", Some(expense("50.00"))).await;
        let reference = json!({ "cash_advance": 1 });

        for method in ["POST", "DELETE"] {
            let (status, body) = send(
                &app,
                method,
                "/api/v1/vouchers/1/references",
                Some(reference.clone()),
            )
            .await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error"], "RESERVED_REFERENCE");
        }
    }
}
