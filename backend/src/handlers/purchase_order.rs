//! HTTP handlers for purchase orders

use axum::{
    extract::State,
    Json,
};
use shared::models::PurchaseOrderWithItems;
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrderList, PurchaseOrderService,
};
use crate::AppState;

fn service(state: &AppState) -> PurchaseOrderService {
    PurchaseOrderService::new(state.store.clone(), state.config.inventory.clone())
}

/// Record a supplier delivery
pub async fn create_purchase_order(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreatePurchaseOrderInput>,
) -> AppResult<Json<ApiResponse<PurchaseOrderWithItems>>> {
    let order = service(&state).create(input).await?;
    Ok(Json(ApiResponse::ok(order)))
}

pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<PurchaseOrderList>>> {
    let orders = service(&state).list().await?;
    Ok(Json(ApiResponse::ok(orders)))
}

pub async fn get_purchase_order(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseOrderWithItems>>> {
    let order = service(&state).get(order_id).await?;
    Ok(Json(ApiResponse::ok(order)))
}
