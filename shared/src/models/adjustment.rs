//! Manual stock adjustment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a manual stock correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "adjustment_type", rename_all = "PascalCase")
)]
pub enum AdjustmentType {
    Addition,
    Subtraction,
}

impl AdjustmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Addition => "Addition",
            AdjustmentType::Subtraction => "Subtraction",
        }
    }

    /// Parse the wire value. Anything other than the two known names is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Addition" => Some(AdjustmentType::Addition),
            "Subtraction" => Some(AdjustmentType::Subtraction),
            _ => None,
        }
    }

    /// Signed ledger delta for `quantity` units in this direction
    pub fn signed(&self, quantity: i32) -> i32 {
        match self {
            AdjustmentType::Addition => quantity,
            AdjustmentType::Subtraction => -quantity,
        }
    }
}

/// Adjustment header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: Uuid,
    pub ref_no: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product line of an adjustment. `current_stock` and `product_name`
/// are snapshots taken by the caller before the adjustment was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentItem {
    pub id: Uuid,
    pub adjustment_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub adjustment_type: AdjustmentType,
    pub current_stock: i32,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
}

impl AdjustmentItem {
    pub fn signed_quantity(&self) -> i32 {
        self.adjustment_type.signed(self.quantity)
    }
}

/// Line item data for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdjustmentItem {
    pub adjustment_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub adjustment_type: AdjustmentType,
    pub current_stock: i32,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentWithItems {
    #[serde(flatten)]
    pub adjustment: Adjustment,
    pub items: Vec<AdjustmentItem>,
}
