//! Supplier deliveries

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    NewPurchaseOrder, NewPurchaseOrderItem, PurchaseOrderStatus, PurchaseOrderWithItems,
};
use shared::validation::{validate_purchase_totals, validate_quantity, PurchaseLine};
use uuid::Uuid;
use validator::Validate;

use super::ledger::{AlertRule, StockLedger};
use super::reference::{generate_order_number, ReferenceKind};
use crate::config::InventoryConfig;
use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Clone)]
pub struct PurchaseOrderService {
    store: Arc<dyn Store>,
    inventory: InventoryConfig,
}

/// Input for recording a purchase order
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: Uuid,
    #[serde(default)]
    pub discount: Decimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub tax: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub balance_amount: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    pub status: PurchaseOrderStatus,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<PurchaseOrderItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub product_name: String,
    pub unit_cost: Decimal,
    pub sub_total: Decimal,
    pub current_stock: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderList {
    pub purchase_orders: Vec<PurchaseOrderWithItems>,
    pub total: usize,
}

impl PurchaseOrderService {
    pub fn new(store: Arc<dyn Store>, inventory: InventoryConfig) -> Self {
        Self { store, inventory }
    }

    fn validate(&self, input: &CreatePurchaseOrderInput) -> AppResult<()> {
        input.validate()?;
        for (index, item) in input.items.iter().enumerate() {
            validate_quantity(item.quantity).map_err(|message| AppError::Validation {
                field: "quantity".to_string(),
                message: format!("item {}: {}", index, message),
            })?;
        }

        if self.inventory.validate_summaries {
            let lines: Vec<PurchaseLine> = input
                .items
                .iter()
                .map(|item| (item.quantity, item.unit_cost, item.sub_total))
                .collect();
            validate_purchase_totals(
                input.total_amount,
                input.balance_amount,
                &[
                    ("discount", input.discount),
                    ("tax", input.tax),
                    ("shippingCost", input.shipping_cost),
                ],
                &lines,
            )?;
        }
        Ok(())
    }

    /// Record a delivery. Every line raises stock and announces the new level.
    pub async fn create(&self, input: CreatePurchaseOrderInput) -> AppResult<PurchaseOrderWithItems> {
        self.validate(&input)?;

        let mut ledger = StockLedger::begin(self.store.as_ref(), &self.inventory).await?;
        ledger
            .uow()
            .find_supplier(input.supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let order = ledger
            .uow()
            .insert_purchase_order(&NewPurchaseOrder {
                ref_no: generate_order_number(ReferenceKind::PurchaseOrder),
                supplier_id: input.supplier_id,
                discount: input.discount,
                notes: input.notes,
                tax: input.tax,
                total_amount: input.total_amount,
                balance_amount: input.balance_amount,
                shipping_cost: input.shipping_cost,
                status: input.status,
            })
            .await?;

        for item in input.items {
            ledger
                .apply(item.product_id, item.quantity, AlertRule::Restock)
                .await?;
            ledger
                .uow()
                .insert_purchase_order_item(&NewPurchaseOrderItem {
                    purchase_order_id: order.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    product_name: item.product_name,
                    unit_cost: item.unit_cost,
                    sub_total: item.sub_total,
                    current_stock: item.current_stock,
                })
                .await?;
        }

        ledger.commit(self.store.as_ref()).await?;
        tracing::info!(
            purchase_order_id = %order.id,
            ref_no = %order.ref_no,
            supplier_id = %order.supplier_id,
            "Purchase order created"
        );

        self.get(order.id).await
    }

    pub async fn get(&self, order_id: Uuid) -> AppResult<PurchaseOrderWithItems> {
        self.store
            .get_purchase_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))
    }

    pub async fn list(&self) -> AppResult<PurchaseOrderList> {
        let purchase_orders = self.store.list_purchase_orders().await?;
        Ok(PurchaseOrderList {
            total: purchase_orders.len(),
            purchase_orders,
        })
    }
}
