//! Customer sales and sales summaries

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    NewSale, NewSaleItem, OrderStatus, PaymentMethod, PaymentStatus, Sale, SaleWithItems,
};
use shared::reporting::{summarize, SaleDigest, SalesSummary};
use shared::validation::{validate_quantity, validate_sale_totals};
use uuid::Uuid;
use validator::Validate;

use super::ledger::{AlertRule, StockLedger};
use super::reference::{generate_order_number, ReferenceKind};
use crate::config::InventoryConfig;
use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn Store>,
    inventory: InventoryConfig,
}

/// Input for recording a sale
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleInput {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    pub sale_amount: Decimal,
    #[serde(default)]
    pub balance_amount: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
    pub status: OrderStatus,
    pub sale_type: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_code: Option<String>,
    pub shop_id: Uuid,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub sales_item: Vec<SaleItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemInput {
    pub product_id: Uuid,
    pub qty: i32,
    pub product_price: Decimal,
    pub product_name: String,
    pub product_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaleList {
    pub sales: Vec<SaleWithItems>,
    pub total: usize,
}

fn customer_not_found() -> AppError {
    AppError::Validation {
        field: "customer_id".to_string(),
        message: "Customer not found".to_string(),
    }
}

impl SaleService {
    pub fn new(store: Arc<dyn Store>, inventory: InventoryConfig) -> Self {
        Self { store, inventory }
    }

    fn check_input(&self, input: &CreateSaleInput) -> AppResult<()> {
        input.validate()?;
        for (index, item) in input.sales_item.iter().enumerate() {
            validate_quantity(item.qty).map_err(|message| AppError::Validation {
                field: "qty".to_string(),
                message: format!("item {}: {}", index, message),
            })?;
        }

        if self.inventory.validate_summaries {
            let lines: Vec<(i32, Decimal)> = input
                .sales_item
                .iter()
                .map(|item| (item.qty, item.product_price))
                .collect();
            validate_sale_totals(
                input.sale_amount,
                input.paid_amount,
                input.balance_amount,
                &lines,
            )?;
        }
        Ok(())
    }

    /// Record a sale.
    ///
    /// A sale with an outstanding balance is charged to the customer's
    /// credit first; the charge, the header, the stock movements and the
    /// line items commit together or not at all.
    pub async fn create(&self, input: CreateSaleInput) -> AppResult<SaleWithItems> {
        self.check_input(&input)?;
        self.store
            .get_shop(input.shop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shop".to_string()))?;

        let mut ledger = StockLedger::begin(self.store.as_ref(), &self.inventory).await?;

        if input.balance_amount > Decimal::ZERO {
            let customer_id = input.customer_id.ok_or_else(customer_not_found)?;
            let customer = ledger
                .uow()
                .lock_customer(customer_id)
                .await?
                .ok_or_else(customer_not_found)?;
            if !customer.can_draw_credit(input.balance_amount) {
                return Err(AppError::CreditLimitExceeded {
                    customer_id,
                    requested: input.balance_amount,
                    available: customer.max_credit_limit,
                });
            }
            let charged = ledger
                .uow()
                .charge_customer_credit(customer_id, input.balance_amount)
                .await?;
            tracing::debug!(
                customer_id = %customer_id,
                unpaid_credit_amount = %charged.unpaid_credit_amount,
                max_credit_limit = %charged.max_credit_limit,
                "Customer credit charged"
            );
        }

        let sale = ledger
            .uow()
            .insert_sale(&NewSale {
                sale_number: generate_order_number(ReferenceKind::Sale),
                customer_id: input.customer_id,
                customer_name: input.customer_name,
                customer_email: input.customer_email,
                sale_amount: input.sale_amount,
                balance_amount: input.balance_amount,
                paid_amount: input.paid_amount,
                status: input.status,
                sale_type: input.sale_type,
                payment_method: input.payment_method,
                transaction_code: input.transaction_code,
                shop_id: input.shop_id,
            })
            .await?;

        for item in input.sales_item {
            ledger
                .apply(item.product_id, -item.qty, AlertRule::Threshold)
                .await
                .map_err(|err| match err {
                    AppError::NotFound(_) => AppError::StockUpdate(item.product_id),
                    other => other,
                })?;
            ledger
                .uow()
                .insert_sale_item(&NewSaleItem {
                    sale_id: sale.id,
                    product_id: item.product_id,
                    qty: item.qty,
                    product_price: item.product_price,
                    product_name: item.product_name,
                    product_image: item.product_image,
                })
                .await?;
        }

        ledger.commit(self.store.as_ref()).await?;
        tracing::info!(
            sale_id = %sale.id,
            sale_number = %sale.sale_number,
            shop_id = %sale.shop_id,
            "Sale created"
        );

        self.get(sale.id).await
    }

    pub async fn get(&self, sale_id: Uuid) -> AppResult<SaleWithItems> {
        self.store
            .get_sale(sale_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    pub async fn list(&self) -> AppResult<SaleList> {
        let sales = self.store.list_sales().await?;
        Ok(SaleList {
            total: sales.len(),
            sales,
        })
    }

    /// Remove a sale record. Stock and customer credit are left as they are.
    pub async fn delete(&self, sale_id: Uuid) -> AppResult<()> {
        if !self.store.delete_sale(sale_id).await? {
            return Err(AppError::NotFound("Sale".to_string()));
        }
        tracing::info!(sale_id = %sale_id, "Sale deleted");
        Ok(())
    }

    pub async fn shop_summary(
        &self,
        shop_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<SalesSummary<Sale>> {
        self.store
            .get_shop(shop_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shop".to_string()))?;
        let sales = self.store.sale_headers(Some(shop_id)).await?;
        Ok(summarize(&sales, now))
    }

    pub async fn all_shops_summary(&self, now: DateTime<Utc>) -> AppResult<SalesSummary<SaleDigest>> {
        let digests: Vec<SaleDigest> = self
            .store
            .sale_headers(None)
            .await?
            .iter()
            .map(SaleDigest::from)
            .collect();
        Ok(summarize(&digests, now))
    }
}
