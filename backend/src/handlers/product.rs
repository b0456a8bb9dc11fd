//! HTTP handlers for the product catalogue

use axum::{extract::State, http::StatusCode, Json};
use shared::models::Product;
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::product::{
    CreateProductInput, ProductList, ProductService, UpdateProductInput,
};
use crate::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProductInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = ProductService::new(state.store).create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// List products, newest first
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let products = ProductService::new(state.store).list().await?;
    Ok(Json(ApiResponse::ok(products)))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = ProductService::new(state.store).get(product_id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// Change catalogue fields; stock is left alone
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = ProductService::new(state.store)
        .update(product_id, input)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    ProductService::new(state.store).delete(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
