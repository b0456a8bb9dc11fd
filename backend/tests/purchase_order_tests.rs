//! Purchase order tests
//!
//! Every received line raises stock and announces the new level; any
//! failure leaves no order, no items and no stock movement behind.

mod common;

use common::*;
use pos_backoffice::services::purchase_order::{CreatePurchaseOrderInput, PurchaseOrderItemInput};
use pos_backoffice::services::PurchaseOrderService;
use pos_backoffice::config::InventoryConfig;
use pos_backoffice::{AppError, Store};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::models::{NotificationStatus, PurchaseOrderStatus};
use shared::stock::NEW_STOCK_LABEL;
use uuid::Uuid;

fn line(product_id: Uuid, quantity: i32, unit_cost: Decimal) -> PurchaseOrderItemInput {
    PurchaseOrderItemInput {
        product_id,
        quantity,
        product_name: "snapshot".to_string(),
        unit_cost,
        sub_total: Decimal::from(quantity) * unit_cost,
        current_stock: 0,
    }
}

fn order(supplier_id: Uuid, items: Vec<PurchaseOrderItemInput>) -> CreatePurchaseOrderInput {
    let total: Decimal = items.iter().map(|i| i.sub_total).sum();
    CreatePurchaseOrderInput {
        supplier_id,
        discount: Decimal::ZERO,
        notes: Some("Weekly delivery".to_string()),
        tax: Decimal::ZERO,
        total_amount: total,
        balance_amount: Decimal::ZERO,
        shipping_cost: Decimal::ZERO,
        status: PurchaseOrderStatus::Paid,
        items,
    }
}

#[tokio::test]
async fn test_delivery_raises_stock_and_announces_it() {
    let (memory, store) = stores();
    let product = memory.seed_product("Coffee 250g", 5, 100, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;
    let service = PurchaseOrderService::new(store.clone(), inventory());

    let created = service
        .create(order(supplier.id, vec![line(product.id, 20, dec!(6.50))]))
        .await
        .unwrap();

    assert_eq!(stock_of(&memory, product.id).await, 25);
    let notifications = store.list_notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].status, NotificationStatus::Info);
    assert_eq!(notifications[0].status_text, NEW_STOCK_LABEL);
    assert_eq!(
        notifications[0].message,
        "New Stock for the product Coffee 250g is 25"
    );

    assert!(created.purchase_order.ref_no.starts_with("PO-"));
    assert_eq!(created.supplier, supplier);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].sub_total, dec!(130.00));
}

#[tokio::test]
async fn test_one_announcement_per_line() {
    let (memory, store) = stores();
    let beans = memory.seed_product("Beans", 0, 5, dec!(2)).await;
    let rice = memory.seed_product("Rice", 1, 5, dec!(3)).await;
    let supplier = memory.seed_supplier("Grain Co").await;
    let service = PurchaseOrderService::new(store.clone(), inventory());

    let created = service
        .create(order(
            supplier.id,
            vec![line(beans.id, 2, dec!(1)), line(rice.id, 3, dec!(2))],
        ))
        .await
        .unwrap();

    assert_eq!(stock_of(&memory, beans.id).await, 2);
    assert_eq!(stock_of(&memory, rice.id).await, 4);
    assert_eq!(created.items[0].product_id, beans.id);
    assert_eq!(created.items[1].product_id, rice.id);
    let notifications = store.list_notifications().await.unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .all(|n| n.status == NotificationStatus::Info));
}

#[tokio::test]
async fn test_unknown_supplier() {
    let (memory, store) = stores();
    let product = memory.seed_product("Coffee", 5, 0, dec!(9)).await;
    let service = PurchaseOrderService::new(store, inventory());

    let err = service
        .create(order(Uuid::new_v4(), vec![line(product.id, 2, dec!(5))]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Supplier"));
    assert_eq!(stock_of(&memory, product.id).await, 5);
    assert_eq!(memory.table_sizes().await.purchase_orders, 0);
}

#[tokio::test]
async fn test_missing_product_rolls_back_the_order() {
    let (memory, store) = stores();
    let first = memory.seed_product("Coffee", 5, 0, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;
    let service = PurchaseOrderService::new(store, inventory());

    let err = service
        .create(order(
            supplier.id,
            vec![line(first.id, 2, dec!(5)), line(Uuid::new_v4(), 1, dec!(5))],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&memory, first.id).await, 5);
    let sizes = memory.table_sizes().await;
    assert_eq!(sizes.purchase_orders, 0);
    assert_eq!(sizes.purchase_order_items, 0);
    assert_eq!(sizes.notifications, 0);
}

#[tokio::test]
async fn test_sub_total_must_match_the_line() {
    let (memory, store) = stores();
    let product = memory.seed_product("Coffee", 5, 0, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;

    let mut bad_line = line(product.id, 2, dec!(5));
    bad_line.sub_total = dec!(11);
    let mut input = order(supplier.id, vec![bad_line.clone()]);
    input.total_amount = dec!(11);

    let err = PurchaseOrderService::new(store.clone(), inventory())
        .create(input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "subTotal"));
    assert_eq!(stock_of(&memory, product.id).await, 5);

    // Trusted headers when summary checks are switched off
    let lenient = InventoryConfig {
        validate_summaries: false,
        ..InventoryConfig::default()
    };
    let mut input = order(supplier.id, vec![bad_line]);
    input.total_amount = dec!(11);
    PurchaseOrderService::new(store, lenient)
        .create(input)
        .await
        .unwrap();
    assert_eq!(stock_of(&memory, product.id).await, 7);
}

#[tokio::test]
async fn test_balance_cannot_exceed_total() {
    let (memory, store) = stores();
    let product = memory.seed_product("Coffee", 5, 0, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;
    let service = PurchaseOrderService::new(store, inventory());

    let mut input = order(supplier.id, vec![line(product.id, 2, dec!(5))]);
    input.balance_amount = dec!(10.01);
    input.status = PurchaseOrderStatus::Partial;

    let err = service.create(input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "balanceAmount"));
}

#[tokio::test]
async fn test_order_without_items_is_rejected() {
    let (memory, store) = stores();
    let supplier = memory.seed_supplier("Highland Roasters").await;
    let service = PurchaseOrderService::new(store, inventory());

    let err = service.create(order(supplier.id, vec![])).await.unwrap_err();

    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "items"));
    assert_eq!(memory.table_sizes().await.purchase_orders, 0);
}

#[tokio::test]
async fn test_get_and_list() {
    let (memory, store) = stores();
    let product = memory.seed_product("Coffee", 5, 0, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;
    let service = PurchaseOrderService::new(store, inventory());

    let created = service
        .create(order(supplier.id, vec![line(product.id, 1, dec!(5))]))
        .await
        .unwrap();

    assert_eq!(service.get(created.purchase_order.id).await.unwrap(), created);
    let list = service.list().await.unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.purchase_orders[0], created);
    assert!(matches!(
        service.get(Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
}
