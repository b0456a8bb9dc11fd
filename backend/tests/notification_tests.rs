//! Notification lifecycle tests

mod common;

use common::*;
use pos_backoffice::services::notification::CreateNotificationInput;
use pos_backoffice::services::NotificationService;
use pos_backoffice::AppError;
use shared::models::NotificationStatus;
use uuid::Uuid;

fn input(message: &str) -> CreateNotificationInput {
    CreateNotificationInput {
        message: message.to_string(),
        status_text: "Notice".to_string(),
        status: NotificationStatus::Info,
    }
}

#[tokio::test]
async fn test_create_list_newest_first() {
    let (_memory, store) = stores();
    let service = NotificationService::new(store);

    let first = service.create(input("Stocktake on Friday")).await.unwrap();
    let second = service.create(input("Shelves restocked")).await.unwrap();
    assert!(!first.read);

    let list = service.list().await.unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.notifications[0].id, second.id);
    assert_eq!(list.notifications[1].id, first.id);
}

#[tokio::test]
async fn test_mark_read_and_unread() {
    let (_memory, store) = stores();
    let service = NotificationService::new(store);
    let created = service.create(input("Stocktake on Friday")).await.unwrap();

    let read = service.mark(created.id, true).await.unwrap();
    assert!(read.read);
    assert!(service.get(created.id).await.unwrap().read);

    let unread = service.mark(created.id, false).await.unwrap();
    assert!(!unread.read);
}

#[tokio::test]
async fn test_delete_and_missing() {
    let (memory, store) = stores();
    let service = NotificationService::new(store);
    let created = service.create(input("Stocktake on Friday")).await.unwrap();

    service.delete(created.id).await.unwrap();
    assert_eq!(memory.table_sizes().await.notifications, 0);

    let missing = Uuid::new_v4();
    assert!(matches!(service.get(missing).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.mark(missing, true).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.delete(created.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_message_is_required() {
    let (_memory, store) = stores();
    let service = NotificationService::new(store);

    let err = service.create(input("")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "message"));
}
