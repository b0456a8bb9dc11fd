//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use pos_backoffice::config::{
    Config, DatabaseConfig, InventoryConfig, NotificationDelivery, ServerConfig, StockPolicy,
};
use pos_backoffice::services::adjustment::{AdjustmentInput, AdjustmentItemInput};
use pos_backoffice::{MemoryStore, Store};
use uuid::Uuid;

/// A fresh in-memory store and the same store behind the service seam
pub fn stores() -> (MemoryStore, Arc<dyn Store>) {
    let memory = MemoryStore::new();
    let store: Arc<dyn Store> = Arc::new(memory.clone());
    (memory, store)
}

pub fn inventory() -> InventoryConfig {
    InventoryConfig::default()
}

pub fn rejecting_oversell() -> InventoryConfig {
    InventoryConfig {
        stock_policy: StockPolicy::RejectOversell,
        ..InventoryConfig::default()
    }
}

pub fn after_commit() -> InventoryConfig {
    InventoryConfig {
        notification_delivery: NotificationDelivery::AfterCommit,
        ..InventoryConfig::default()
    }
}

pub fn test_config(inventory: InventoryConfig) -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        inventory,
    }
}

pub async fn stock_of(store: &MemoryStore, product_id: Uuid) -> i32 {
    store
        .get_product(product_id)
        .await
        .unwrap()
        .expect("product exists")
        .stock_qty
}

pub fn adjustment_item(product_id: Uuid, quantity: i32, kind: &str) -> AdjustmentItemInput {
    AdjustmentItemInput {
        product_id,
        quantity,
        adjustment_type: kind.to_string(),
        current_stock: 0,
        product_name: "snapshot".to_string(),
    }
}

pub fn adjustment(reason: &str, items: Vec<AdjustmentItemInput>) -> AdjustmentInput {
    AdjustmentInput {
        reason: reason.to_string(),
        items,
    }
}
