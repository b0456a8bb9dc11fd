//! Point-of-sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfilment state of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "order_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

/// How much of the sale was settled at the till
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "payment_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "payment_method", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub sale_number: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub sale_amount: Decimal,
    pub balance_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: OrderStatus,
    pub sale_type: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_code: Option<String>,
    pub shop_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub sale_number: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub sale_amount: Decimal,
    pub balance_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: OrderStatus,
    pub sale_type: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_code: Option<String>,
    pub shop_id: Uuid,
}

/// A sold product line with price, name and image frozen at sale time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub qty: i32,
    pub product_price: Decimal,
    pub product_name: String,
    pub product_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSaleItem {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub qty: i32,
    pub product_price: Decimal,
    pub product_name: String,
    pub product_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub sales_item: Vec<SaleItem>,
}
