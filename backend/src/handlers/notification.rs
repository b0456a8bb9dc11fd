//! HTTP handlers for notifications

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use shared::models::Notification;
use shared::ApiResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::notification::{
    CreateNotificationInput, MarkNotificationInput, NotificationList, NotificationService,
};
use crate::AppState;

pub async fn create_notification(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNotificationInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Notification>>)> {
    let notification = NotificationService::new(state.store).create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification))))
}

/// List notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let notifications = NotificationService::new(state.store).list().await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

pub async fn get_notification(
    State(state): State<AppState>,
    AppPath(notification_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = NotificationService::new(state.store)
        .get(notification_id)
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// Set the read flag; `{}` marks the notification read
pub async fn mark_notification(
    State(state): State<AppState>,
    AppPath(notification_id): AppPath<Uuid>,
    AppJson(input): AppJson<MarkNotificationInput>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = NotificationService::new(state.store)
        .mark(notification_id, input.read)
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    AppPath(notification_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    NotificationService::new(state.store)
        .delete(notification_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
