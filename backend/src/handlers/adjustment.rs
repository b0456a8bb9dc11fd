//! HTTP handlers for stock adjustments

use axum::{
    extract::State,
    Json,
};
use shared::models::{Adjustment, AdjustmentWithItems};
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::adjustment::{AdjustmentInput, AdjustmentList, AdjustmentService};
use crate::AppState;

fn service(state: &AppState) -> AdjustmentService {
    AdjustmentService::new(state.store.clone(), state.config.inventory.clone())
}

/// Create an adjustment and apply its stock movements
pub async fn create_adjustment(
    State(state): State<AppState>,
    AppJson(input): AppJson<AdjustmentInput>,
) -> AppResult<Json<ApiResponse<AdjustmentWithItems>>> {
    let adjustment = service(&state).create(input).await?;
    Ok(Json(ApiResponse::ok(adjustment)))
}

pub async fn list_adjustments(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AdjustmentList>>> {
    let adjustments = service(&state).list().await?;
    Ok(Json(ApiResponse::ok(adjustments)))
}

pub async fn get_adjustment(
    State(state): State<AppState>,
    AppPath(adjustment_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<AdjustmentWithItems>>> {
    let adjustment = service(&state).get(adjustment_id).await?;
    Ok(Json(ApiResponse::ok(adjustment)))
}

/// Replace an adjustment's reason and items, moving stock by the difference
pub async fn update_adjustment(
    State(state): State<AppState>,
    AppPath(adjustment_id): AppPath<Uuid>,
    AppJson(input): AppJson<AdjustmentInput>,
) -> AppResult<Json<ApiResponse<AdjustmentWithItems>>> {
    let adjustment = service(&state).update(adjustment_id, input).await?;
    Ok(Json(ApiResponse::ok(adjustment)))
}

pub async fn delete_adjustment(
    State(state): State<AppState>,
    AppPath(adjustment_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Adjustment>>> {
    let adjustment = service(&state).delete(adjustment_id).await?;
    Ok(Json(ApiResponse::ok(adjustment)))
}
