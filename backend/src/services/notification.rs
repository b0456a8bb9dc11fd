//! Stock advisories
//!
//! [`NotificationEmitter`] writes advisories raised while a stock
//! transaction runs, either inside its unit of work or after it commits.
//! [`NotificationService`] covers the stored notifications' own lifecycle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{NewNotification, Notification, NotificationStatus};
use uuid::Uuid;
use validator::Validate;

use crate::config::NotificationDelivery;
use crate::error::{AppError, AppResult};
use crate::store::{Store, UnitOfWork};

/// Writes advisories for one stock transaction
pub struct NotificationEmitter {
    delivery: NotificationDelivery,
    pending: Vec<NewNotification>,
}

impl NotificationEmitter {
    pub fn new(delivery: NotificationDelivery) -> Self {
        Self {
            delivery,
            pending: Vec::new(),
        }
    }

    /// Record one advisory. In-transaction delivery fails the caller's unit
    /// of work when the insert fails.
    pub async fn emit(
        &mut self,
        uow: &mut dyn UnitOfWork,
        notification: NewNotification,
    ) -> AppResult<()> {
        match self.delivery {
            NotificationDelivery::InTransaction => {
                let stored = uow.insert_notification(&notification).await?;
                tracing::debug!(
                    notification_id = %stored.id,
                    status = stored.status.as_str(),
                    "Notification written"
                );
            }
            NotificationDelivery::AfterCommit => self.pending.push(notification),
        }
        Ok(())
    }

    /// Write buffered advisories once the stock transaction has committed.
    /// Failures are logged and dropped.
    pub async fn flush(self, store: &dyn Store) {
        for notification in self.pending {
            if let Err(err) = store.insert_notification(&notification).await {
                tracing::warn!(
                    error = %err,
                    status = notification.status.as_str(),
                    message = %notification.message,
                    "Dropped notification after commit"
                );
            }
        }
    }
}

/// Input for creating a notification by hand
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationInput {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    #[validate(length(min = 1, message = "Status text is required"))]
    pub status_text: String,
    pub status: NotificationStatus,
}

/// Input for toggling the read flag
#[derive(Debug, Deserialize)]
pub struct MarkNotificationInput {
    #[serde(default = "default_read")]
    pub read: bool,
}

fn default_read() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub total: usize,
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateNotificationInput) -> AppResult<Notification> {
        input.validate()?;
        let notification = NewNotification::new(input.message, input.status_text, input.status);
        self.store.insert_notification(&notification).await
    }

    pub async fn list(&self) -> AppResult<NotificationList> {
        let notifications = self.store.list_notifications().await?;
        Ok(NotificationList {
            total: notifications.len(),
            notifications,
        })
    }

    pub async fn get(&self, notification_id: Uuid) -> AppResult<Notification> {
        self.store
            .get_notification(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification".to_string()))
    }

    pub async fn mark(&self, notification_id: Uuid, read: bool) -> AppResult<Notification> {
        self.store
            .set_notification_read(notification_id, read)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification".to_string()))
    }

    pub async fn delete(&self, notification_id: Uuid) -> AppResult<()> {
        if !self.store.delete_notification(notification_id).await? {
            return Err(AppError::NotFound("Notification".to_string()));
        }
        tracing::info!(notification_id = %notification_id, "Notification deleted");
        Ok(())
    }
}
