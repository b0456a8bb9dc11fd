//! Stock advisory notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "notification_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationStatus {
    Info,
    Warning,
    Danger,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Info => "INFO",
            NotificationStatus::Warning => "WARNING",
            NotificationStatus::Danger => "DANGER",
        }
    }
}

/// A stored notification. Not linked back to the product or transaction
/// that raised it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub status_text: String,
    pub status: NotificationStatus,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification waiting to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub message: String,
    pub status_text: String,
    pub status: NotificationStatus,
}

impl NewNotification {
    pub fn new(
        message: impl Into<String>,
        status_text: impl Into<String>,
        status: NotificationStatus,
    ) -> Self {
        Self {
            message: message.into(),
            status_text: status_text.into(),
            status,
        }
    }
}
