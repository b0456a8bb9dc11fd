//! Product catalogue
//!
//! Opening stock is taken at creation. Updates only touch catalogue fields;
//! stock moves exclusively through the ledger.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{NewProduct, Product, ProductChanges};
use shared::validation::validate_amount;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::Store;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "SKU must be 1-100 characters"))]
    pub sku: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Opening stock cannot be negative"))]
    pub stock_qty: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Alert quantity cannot be negative"))]
    pub alert_qty: i32,
    pub price: Decimal,
    #[serde(default)]
    pub buying_price: Decimal,
}

/// Catalogue changes. There is no stock field; a `stockQty` in the body is
/// ignored.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "SKU must be 1-100 characters"))]
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "Alert quantity cannot be negative"))]
    pub alert_qty: Option<i32>,
    pub price: Option<Decimal>,
    pub buying_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub total: usize,
}

fn check_price(field: &str, amount: Option<Decimal>) -> AppResult<()> {
    if let Some(amount) = amount {
        validate_amount(amount).map_err(|m| AppError::Validation {
            field: field.to_string(),
            message: m.to_string(),
        })?;
    }
    Ok(())
}

fn sku_taken(sku: &str) -> AppError {
    AppError::Conflict(format!("Product with sku {} already exists", sku))
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;
        check_price("price", Some(input.price))?;
        check_price("buyingPrice", Some(input.buying_price))?;

        if self.store.find_product_by_sku(&input.sku).await?.is_some() {
            return Err(sku_taken(&input.sku));
        }

        let product = self
            .store
            .insert_product(&NewProduct {
                name: input.name,
                sku: input.sku,
                stock_qty: input.stock_qty,
                alert_qty: input.alert_qty,
                price: input.price,
                buying_price: input.buying_price,
            })
            .await?;

        tracing::info!(
            product_id = %product.id,
            sku = %product.sku,
            stock_qty = product.stock_qty,
            "Product created"
        );
        Ok(product)
    }

    pub async fn list(&self) -> AppResult<ProductList> {
        let products = self.store.list_products().await?;
        Ok(ProductList {
            total: products.len(),
            products,
        })
    }

    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        self.store
            .get_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        input.validate()?;
        check_price("price", input.price)?;
        check_price("buyingPrice", input.buying_price)?;

        if let Some(sku) = &input.sku {
            if let Some(existing) = self.store.find_product_by_sku(sku).await? {
                if existing.id != product_id {
                    return Err(sku_taken(sku));
                }
            }
        }

        let changes = ProductChanges {
            name: input.name,
            sku: input.sku,
            alert_qty: input.alert_qty,
            price: input.price,
            buying_price: input.buying_price,
        };
        let product = self
            .store
            .update_product(product_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tracing::info!(product_id = %product_id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        if !self.store.delete_product(product_id).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }
        tracing::info!(product_id = %product_id, "Product deleted");
        Ok(())
    }
}
