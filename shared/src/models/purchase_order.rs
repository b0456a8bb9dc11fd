//! Supplier purchase order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Supplier;

/// Payment state of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "purchase_order_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PurchaseOrderStatus {
    Paid,
    Partial,
    Unpaid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub ref_no: String,
    pub supplier_id: Uuid,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub tax: Decimal,
    pub total_amount: Decimal,
    pub balance_amount: Decimal,
    pub shipping_cost: Decimal,
    pub status: PurchaseOrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Header data for insertion; the reference number is assigned by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseOrder {
    pub ref_no: String,
    pub supplier_id: Uuid,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub tax: Decimal,
    pub total_amount: Decimal,
    pub balance_amount: Decimal,
    pub shipping_cost: Decimal,
    pub status: PurchaseOrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub product_name: String,
    pub unit_cost: Decimal,
    pub sub_total: Decimal,
    pub current_stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseOrderItem {
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub product_name: String,
    pub unit_cost: Decimal,
    pub sub_total: Decimal,
    pub current_stock: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderWithItems {
    #[serde(flatten)]
    pub purchase_order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
    pub supplier: Supplier,
}
