//! Stock threshold policy and ledger arithmetic

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewNotification, NotificationStatus, Product};

pub const STOCK_OUT_LABEL: &str = "Stock Out";
pub const LOW_STOCK_LABEL: &str = "Warning";
pub const NEW_STOCK_LABEL: &str = "New Stock";

/// Map a product's post-update stock to an advisory, if one is due.
///
/// Stock at or below zero is out of stock; anything under the alert
/// quantity is low. Otherwise nothing is raised.
pub fn threshold_notification(product: &Product) -> Option<NewNotification> {
    if product.stock_qty <= 0 {
        Some(NewNotification::new(
            format!(
                "{} is out of stock. current stock is {}",
                product.name, product.stock_qty
            ),
            STOCK_OUT_LABEL,
            NotificationStatus::Danger,
        ))
    } else if product.stock_qty < product.alert_qty {
        Some(NewNotification::new(
            format!(
                "{} is low in stock. current stock is {}",
                product.name, product.stock_qty
            ),
            LOW_STOCK_LABEL,
            NotificationStatus::Warning,
        ))
    } else {
        None
    }
}

/// Advisory raised for every received purchase line
pub fn restock_notification(product: &Product) -> NewNotification {
    NewNotification::new(
        format!(
            "New Stock for the product {} is {}",
            product.name, product.stock_qty
        ),
        NEW_STOCK_LABEL,
        NotificationStatus::Info,
    )
}

/// A line sum left the range of a stock quantity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Quantity for product {product_id} is out of range")]
pub struct QuantityOverflow {
    pub product_id: Uuid,
}

/// Net signed quantity per product, keyed in order of first appearance
pub fn net_quantities(lines: &[(Uuid, i32)]) -> Result<Vec<(Uuid, i32)>, QuantityOverflow> {
    let mut order: Vec<(Uuid, i32)> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    for &(product_id, qty) in lines {
        match index.get(&product_id) {
            Some(&i) => {
                order[i].1 = order[i]
                    .1
                    .checked_add(qty)
                    .ok_or(QuantityOverflow { product_id })?;
            }
            None => {
                index.insert(product_id, order.len());
                order.push((product_id, qty));
            }
        }
    }
    Ok(order)
}

/// Ledger deltas that move stock from the effect of `old` lines to the
/// effect of `new` lines. Products whose net effect is unchanged are omitted.
/// Products from `new` come first, in order, followed by products only in `old`.
pub fn reconcile(
    old: &[(Uuid, i32)],
    new: &[(Uuid, i32)],
) -> Result<Vec<(Uuid, i32)>, QuantityOverflow> {
    let old_order = net_quantities(old)?;
    let old_net: HashMap<Uuid, i32> = old_order.iter().copied().collect();
    let new_net = net_quantities(new)?;

    let mut deltas = Vec::with_capacity(new_net.len() + old_order.len());
    for &(product_id, qty) in &new_net {
        let previous = old_net.get(&product_id).copied().unwrap_or(0);
        let delta = qty
            .checked_sub(previous)
            .ok_or(QuantityOverflow { product_id })?;
        deltas.push((product_id, delta));
    }

    for (product_id, qty) in old_order {
        if !new_net.iter().any(|(n, _)| *n == product_id) {
            let delta = qty
                .checked_neg()
                .ok_or(QuantityOverflow { product_id })?;
            deltas.push((product_id, delta));
        }
    }

    deltas.retain(|(_, delta)| *delta != 0);
    Ok(deltas)
}
