//! HTTP handlers for customers

use axum::{extract::State, http::StatusCode, Json};
use shared::models::Customer;
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::customer::{CreateCustomerInput, CustomerList, CustomerService};
use crate::AppState;

pub async fn create_customer(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateCustomerInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    let customer = CustomerService::new(state.store).create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(customer))))
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let customers = CustomerService::new(state.store).list().await?;
    Ok(Json(ApiResponse::ok(customers)))
}

pub async fn get_customer(
    State(state): State<AppState>,
    AppPath(customer_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let customer = CustomerService::new(state.store).get(customer_id).await?;
    Ok(Json(ApiResponse::ok(customer)))
}
