//! HTTP handlers for sales and sales summaries

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared::models::{Sale, SaleWithItems};
use shared::reporting::{SaleDigest, SalesSummary};
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::sale::{CreateSaleInput, SaleList, SaleService};
use crate::AppState;

fn service(state: &AppState) -> SaleService {
    SaleService::new(state.store.clone(), state.config.inventory.clone())
}

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSaleInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<SaleWithItems>>)> {
    let sale = service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sale))))
}

pub async fn list_sales(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SaleList>>> {
    let sales = service(&state).list().await?;
    Ok(Json(ApiResponse::ok(sales)))
}

pub async fn get_sale(
    State(state): State<AppState>,
    AppPath(sale_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<SaleWithItems>>> {
    let sale = service(&state).get(sale_id).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    AppPath(sale_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    service(&state).delete(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sales of one shop bucketed by period and tender
pub async fn shop_sales_summary(
    State(state): State<AppState>,
    AppPath(shop_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<SalesSummary<Sale>>>> {
    let summary = service(&state).shop_summary(shop_id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Sales of every shop bucketed by period and tender
pub async fn all_shops_sales_summary(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<SalesSummary<SaleDigest>>>> {
    let summary = service(&state).all_shops_summary(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
