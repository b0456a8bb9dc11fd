//! Product catalogue model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable product and its current stock position.
///
/// `stock_qty` is set once when the product is created. After that it is
/// only ever changed by a ledger delta applied inside a sale, purchase order
/// or adjustment unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock_qty: i32,
    /// Stock level below which a low-stock warning is raised
    pub alert_qty: i32,
    pub price: Decimal,
    pub buying_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product waiting to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    /// Opening stock
    pub stock_qty: i32,
    pub alert_qty: i32,
    pub price: Decimal,
    pub buying_price: Decimal,
}

/// Catalogue fields an update may change. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub alert_qty: Option<i32>,
    pub price: Option<Decimal>,
    pub buying_price: Option<Decimal>,
}

impl ProductChanges {
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(alert_qty) = self.alert_qty {
            product.alert_qty = alert_qty;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(buying_price) = self.buying_price {
            product.buying_price = buying_price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_leave_stock_alone() {
        let mut product = Product {
            id: Uuid::new_v4(),
            name: "Rice 5kg".to_string(),
            sku: "RICE-5".to_string(),
            stock_qty: 40,
            alert_qty: 5,
            price: Decimal::from(12),
            buying_price: Decimal::from(9),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        ProductChanges {
            name: Some("Rice 10kg".to_string()),
            price: Some(Decimal::from(22)),
            ..ProductChanges::default()
        }
        .apply_to(&mut product);

        assert_eq!(product.name, "Rice 10kg");
        assert_eq!(product.price, Decimal::from(22));
        assert_eq!(product.sku, "RICE-5");
        assert_eq!(product.stock_qty, 40);
    }
}
