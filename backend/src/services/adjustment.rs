//! Manual stock corrections

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{Adjustment, AdjustmentType, AdjustmentWithItems, NewAdjustmentItem};
use shared::stock::reconcile;
use shared::validation::validate_quantity;
use uuid::Uuid;
use validator::Validate;

use super::ledger::{AlertRule, StockLedger};
use super::reference::{generate_order_number, ReferenceKind};
use crate::config::InventoryConfig;
use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Clone)]
pub struct AdjustmentService {
    store: Arc<dyn Store>,
    inventory: InventoryConfig,
}

/// Input for creating or replacing an adjustment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentInput {
    #[serde(default)]
    pub reason: String,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<AdjustmentItemInput>,
}

/// One adjusted product. `currentStock` and `productName` are stored as
/// given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    #[serde(rename = "type")]
    pub adjustment_type: String,
    pub current_stock: i32,
    pub product_name: String,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentList {
    pub adjustments: Vec<AdjustmentWithItems>,
    pub total: usize,
}

/// A validated line
#[derive(Debug, Clone)]
struct AdjustmentLine {
    product_id: Uuid,
    quantity: i32,
    adjustment_type: AdjustmentType,
    current_stock: i32,
    product_name: String,
}

impl AdjustmentLine {
    fn signed(&self) -> (Uuid, i32) {
        (self.product_id, self.adjustment_type.signed(self.quantity))
    }

    fn into_new_item(self, adjustment_id: Uuid) -> NewAdjustmentItem {
        NewAdjustmentItem {
            adjustment_id,
            product_id: self.product_id,
            quantity: self.quantity,
            adjustment_type: self.adjustment_type,
            current_stock: self.current_stock,
            product_name: self.product_name,
        }
    }
}

fn parse_lines(input: &AdjustmentInput) -> AppResult<Vec<AdjustmentLine>> {
    input.validate()?;
    input
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| -> AppResult<AdjustmentLine> {
            validate_quantity(item.quantity).map_err(|message| AppError::Validation {
                field: "quantity".to_string(),
                message: format!("item {}: {}", index, message),
            })?;
            let adjustment_type = AdjustmentType::parse(&item.adjustment_type).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Invalid adjustment type '{}' for item {}",
                    item.adjustment_type, index
                ))
            })?;
            Ok(AdjustmentLine {
                product_id: item.product_id,
                quantity: item.quantity,
                adjustment_type,
                current_stock: item.current_stock,
                product_name: item.product_name.clone(),
            })
        })
        .collect()
}

impl AdjustmentService {
    pub fn new(store: Arc<dyn Store>, inventory: InventoryConfig) -> Self {
        Self { store, inventory }
    }

    /// Record an adjustment and move stock for every line in one unit of work
    pub async fn create(&self, input: AdjustmentInput) -> AppResult<AdjustmentWithItems> {
        let lines = parse_lines(&input)?;

        let mut ledger = StockLedger::begin(self.store.as_ref(), &self.inventory).await?;
        let ref_no = generate_order_number(ReferenceKind::Adjustment);
        let adjustment = ledger.uow().insert_adjustment(&ref_no, &input.reason).await?;

        for line in lines {
            let (product_id, delta) = line.signed();
            ledger.apply(product_id, delta, AlertRule::Threshold).await?;
            ledger
                .uow()
                .insert_adjustment_item(&line.into_new_item(adjustment.id))
                .await?;
        }

        ledger.commit(self.store.as_ref()).await?;
        tracing::info!(
            adjustment_id = %adjustment.id,
            ref_no = %adjustment.ref_no,
            "Adjustment created"
        );

        self.get(adjustment.id).await
    }

    pub async fn get(&self, adjustment_id: Uuid) -> AppResult<AdjustmentWithItems> {
        self.store
            .get_adjustment(adjustment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Adjustment".to_string()))
    }

    pub async fn list(&self) -> AppResult<AdjustmentList> {
        let adjustments = self.store.list_adjustments().await?;
        Ok(AdjustmentList {
            total: adjustments.len(),
            adjustments,
        })
    }

    /// Replace the reason and line items of an adjustment.
    ///
    /// Stock moves by the difference between the new and the stored lines'
    /// net effect per product, so resubmitting the same items is a no-op
    /// for stock.
    pub async fn update(
        &self,
        adjustment_id: Uuid,
        input: AdjustmentInput,
    ) -> AppResult<AdjustmentWithItems> {
        let lines = parse_lines(&input)?;

        let mut ledger = StockLedger::begin(self.store.as_ref(), &self.inventory).await?;
        ledger
            .uow()
            .update_adjustment_reason(adjustment_id, &input.reason)
            .await?
            .ok_or_else(|| AppError::NotFound("Adjustment".to_string()))?;

        let stored: Vec<(Uuid, i32)> = ledger
            .uow()
            .adjustment_items(adjustment_id)
            .await?
            .iter()
            .map(|item| (item.product_id, item.signed_quantity()))
            .collect();
        let requested: Vec<(Uuid, i32)> = lines.iter().map(AdjustmentLine::signed).collect();

        let deltas = reconcile(&stored, &requested)?;
        for &(product_id, delta) in &deltas {
            ledger.apply(product_id, delta, AlertRule::Threshold).await?;
        }

        ledger.uow().delete_adjustment_items(adjustment_id).await?;
        for line in lines {
            ledger
                .uow()
                .insert_adjustment_item(&line.into_new_item(adjustment_id))
                .await?;
        }

        ledger.commit(self.store.as_ref()).await?;
        tracing::info!(
            adjustment_id = %adjustment_id,
            products_moved = deltas.len(),
            "Adjustment updated"
        );

        self.get(adjustment_id).await
    }

    /// Remove an adjustment record. Stock is left as it is.
    pub async fn delete(&self, adjustment_id: Uuid) -> AppResult<Adjustment> {
        let adjustment = self
            .store
            .delete_adjustment(adjustment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Adjustment".to_string()))?;
        tracing::info!(adjustment_id = %adjustment_id, "Adjustment deleted");
        Ok(adjustment)
    }
}
