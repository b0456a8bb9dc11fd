//! The single "apply delta and maybe notify" primitive shared by every
//! stock transaction

use shared::models::Product;
use shared::stock::{restock_notification, threshold_notification};
use uuid::Uuid;

use super::notification::NotificationEmitter;
use crate::config::{InventoryConfig, StockPolicy};
use crate::error::{AppError, AppResult};
use crate::store::{Store, UnitOfWork};

/// Which advisory a stock movement raises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertRule {
    /// Out-of-stock or low-stock advisory when the threshold is crossed
    Threshold,
    /// Always announce the new stock level
    Restock,
}

/// An open stock transaction: one unit of work plus its advisories
pub struct StockLedger {
    uow: Box<dyn UnitOfWork>,
    policy: StockPolicy,
    emitter: NotificationEmitter,
}

impl StockLedger {
    pub async fn begin(store: &dyn Store, inventory: &InventoryConfig) -> AppResult<Self> {
        Ok(Self {
            uow: store.begin().await?,
            policy: inventory.stock_policy,
            emitter: NotificationEmitter::new(inventory.notification_delivery),
        })
    }

    /// The underlying unit of work, for header and line item writes
    pub fn uow(&mut self) -> &mut dyn UnitOfWork {
        &mut *self.uow
    }

    /// Add `delta` to the product's stock and raise the advisory `rule`
    /// calls for. Returns the product as it stands after the update.
    pub async fn apply(
        &mut self,
        product_id: Uuid,
        delta: i32,
        rule: AlertRule,
    ) -> AppResult<Product> {
        let product = self
            .uow
            .apply_stock_delta(product_id, delta)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if self.policy == StockPolicy::RejectOversell && delta < 0 && product.stock_qty < 0 {
            return Err(AppError::InsufficientStock {
                product_id,
                resulting: product.stock_qty,
            });
        }

        tracing::debug!(
            product_id = %product_id,
            delta,
            stock_qty = product.stock_qty,
            "Stock updated"
        );

        let advisory = match rule {
            AlertRule::Threshold => threshold_notification(&product),
            AlertRule::Restock => Some(restock_notification(&product)),
        };
        if let Some(notification) = advisory {
            self.emitter.emit(&mut *self.uow, notification).await?;
        }

        Ok(product)
    }

    /// Commit the unit of work, then deliver any buffered advisories
    pub async fn commit(self, store: &dyn Store) -> AppResult<()> {
        self.uow.commit().await?;
        self.emitter.flush(store).await;
        Ok(())
    }
}
