//! Product catalogue tests
//!
//! SKU uniqueness, catalogue-only updates and the guard against deleting a
//! product that transactions still point at.

mod common;

use common::*;
use pos_backoffice::services::product::{CreateProductInput, UpdateProductInput};
use pos_backoffice::services::{AdjustmentService, ProductService};
use pos_backoffice::AppError;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn new_product(name: &str, sku: &str, stock_qty: i32) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        sku: sku.to_string(),
        stock_qty,
        alert_qty: 5,
        price: dec!(12.50),
        buying_price: dec!(9),
    }
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_takes_opening_stock() {
    let (memory, store) = stores();
    let service = ProductService::new(store);

    let product = service.create(new_product("Rice 5kg", "RICE-5", 40)).await.unwrap();

    assert_eq!(product.sku, "RICE-5");
    assert_eq!(stock_of(&memory, product.id).await, 40);
}

#[tokio::test]
async fn test_duplicate_sku_is_a_conflict() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);

    service.create(new_product("Rice 5kg", "RICE-5", 40)).await.unwrap();
    let err = service
        .create(new_product("Rice 5kg (promo)", "RICE-5", 10))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref m) if m.contains("RICE-5")));
    assert_eq!(service.list().await.unwrap().total, 1);
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);

    let err = service.create(new_product("", "EMPTY", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));

    let err = service.create(new_product("Oil", "OIL-1", -1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));

    let mut input = new_product("Oil", "OIL-1", 1);
    input.price = dec!(-1);
    let err = service.create(input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "price"));
}

// ============================================================================
// Reads, update and delete
// ============================================================================

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);

    service.create(new_product("Salt", "SALT", 1)).await.unwrap();
    service.create(new_product("Pepper", "PEPPER", 1)).await.unwrap();

    let list = service.list().await.unwrap();
    assert_eq!(list.total, 2);
    assert_eq!(list.products[0].sku, "PEPPER");
    assert_eq!(list.products[1].sku, "SALT");
}

#[tokio::test]
async fn test_get_unknown_product() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);

    let err = service.get(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Product"));
}

#[tokio::test]
async fn test_update_changes_catalogue_fields_only() {
    let (memory, store) = stores();
    let service = ProductService::new(store);
    let product = service.create(new_product("Rice 5kg", "RICE-5", 40)).await.unwrap();

    let updated = service
        .update(
            product.id,
            UpdateProductInput {
                name: Some("Rice 5kg Jasmine".to_string()),
                price: Some(dec!(14)),
                ..UpdateProductInput::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Rice 5kg Jasmine");
    assert_eq!(updated.price, dec!(14));
    assert_eq!(updated.sku, "RICE-5");
    assert_eq!(updated.alert_qty, 5);
    assert_eq!(stock_of(&memory, product.id).await, 40);
}

#[tokio::test]
async fn test_update_to_a_taken_sku_is_a_conflict() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);
    service.create(new_product("Salt", "SALT", 1)).await.unwrap();
    let pepper = service.create(new_product("Pepper", "PEPPER", 1)).await.unwrap();

    let err = service
        .update(
            pepper.id,
            UpdateProductInput {
                sku: Some("SALT".to_string()),
                ..UpdateProductInput::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let same = service
        .update(
            pepper.id,
            UpdateProductInput {
                sku: Some("PEPPER".to_string()),
                ..UpdateProductInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.sku, "PEPPER");
}

#[tokio::test]
async fn test_update_unknown_product() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);

    let err = service
        .update(Uuid::new_v4(), UpdateProductInput::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Product"));
}

#[tokio::test]
async fn test_delete() {
    let (_memory, store) = stores();
    let service = ProductService::new(store);
    let product = service.create(new_product("Salt", "SALT", 1)).await.unwrap();

    service.delete(product.id).await.unwrap();

    assert!(matches!(
        service.get(product.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        service.delete(product.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_delete_keeps_products_with_history() {
    let (memory, store) = stores();
    let service = ProductService::new(store.clone());
    let product = service.create(new_product("Salt", "SALT", 10)).await.unwrap();
    AdjustmentService::new(store, inventory())
        .create(adjustment("Recount", vec![adjustment_item(product.id, 2, "Addition")]))
        .await
        .unwrap();

    let err = service.delete(product.id).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(stock_of(&memory, product.id).await, 12);
}
