//! Persistence seam
//!
//! Services never talk to a connection pool directly. They receive a
//! [`Store`] and open a [`UnitOfWork`] for every write that touches stock.
//! A unit of work commits only through [`UnitOfWork::commit`]; dropping it
//! rolls every change back.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{
    Adjustment, AdjustmentItem, AdjustmentWithItems, Customer, NewAdjustmentItem, NewCustomer,
    NewNotification, NewProduct, NewPurchaseOrder, NewPurchaseOrderItem, NewSale, NewSaleItem,
    Notification, Product, ProductChanges, PurchaseOrder, PurchaseOrderItem, PurchaseOrderWithItems, Sale, SaleItem,
    SaleWithItems, Shop, Supplier,
};
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// One atomic write spanning headers, ledger deltas, notifications and
/// line items.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Add `delta` to the product's stock in place and return the updated
    /// row, or `None` when the product does not exist.
    async fn apply_stock_delta(&mut self, product_id: Uuid, delta: i32)
        -> AppResult<Option<Product>>;

    async fn insert_notification(&mut self, notification: &NewNotification)
        -> AppResult<Notification>;

    /// Load a customer and hold it against concurrent credit changes until
    /// the unit of work ends.
    async fn lock_customer(&mut self, customer_id: Uuid) -> AppResult<Option<Customer>>;

    /// Raise unpaid credit and lower the credit limit by `amount` together
    async fn charge_customer_credit(&mut self, customer_id: Uuid, amount: Decimal)
        -> AppResult<Customer>;

    async fn find_supplier(&mut self, supplier_id: Uuid) -> AppResult<Option<Supplier>>;

    async fn insert_adjustment(&mut self, ref_no: &str, reason: &str) -> AppResult<Adjustment>;

    async fn update_adjustment_reason(&mut self, adjustment_id: Uuid, reason: &str)
        -> AppResult<Option<Adjustment>>;

    async fn adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<Vec<AdjustmentItem>>;

    async fn delete_adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<u64>;

    async fn insert_adjustment_item(&mut self, item: &NewAdjustmentItem)
        -> AppResult<AdjustmentItem>;

    async fn insert_purchase_order(&mut self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder>;

    async fn insert_purchase_order_item(&mut self, item: &NewPurchaseOrderItem)
        -> AppResult<PurchaseOrderItem>;

    async fn insert_sale(&mut self, sale: &NewSale) -> AppResult<Sale>;

    async fn insert_sale_item(&mut self, item: &NewSaleItem) -> AppResult<SaleItem>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Shared store handle injected into every service
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    async fn ping(&self) -> AppResult<()>;

    /// Fails with `Conflict` when the SKU is taken
    async fn insert_product(&self, product: &NewProduct) -> AppResult<Product>;

    async fn get_product(&self, product_id: Uuid) -> AppResult<Option<Product>>;

    async fn find_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>>;

    /// Newest first
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    /// Change catalogue fields only; `stock_qty` is never touched here
    async fn update_product(&self, product_id: Uuid, changes: &ProductChanges)
        -> AppResult<Option<Product>>;

    /// Fails with `Conflict` while any line item still references the product
    async fn delete_product(&self, product_id: Uuid) -> AppResult<bool>;

    /// Fails with `Conflict` when the email or phone is taken
    async fn insert_customer(&self, customer: &NewCustomer) -> AppResult<Customer>;

    async fn get_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>>;

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    async fn find_customer_by_phone(&self, phone: &str) -> AppResult<Option<Customer>>;

    /// Newest first
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;

    async fn get_shop(&self, shop_id: Uuid) -> AppResult<Option<Shop>>;

    async fn get_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<AdjustmentWithItems>>;

    async fn list_adjustments(&self) -> AppResult<Vec<AdjustmentWithItems>>;

    /// Remove an adjustment and its items; returns the removed header
    async fn delete_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<Adjustment>>;

    async fn get_purchase_order(&self, order_id: Uuid)
        -> AppResult<Option<PurchaseOrderWithItems>>;

    async fn list_purchase_orders(&self) -> AppResult<Vec<PurchaseOrderWithItems>>;

    async fn get_sale(&self, sale_id: Uuid) -> AppResult<Option<SaleWithItems>>;

    /// All sales with items, newest first
    async fn list_sales(&self) -> AppResult<Vec<SaleWithItems>>;

    /// Sale headers, optionally for one shop, newest first
    async fn sale_headers(&self, shop_id: Option<Uuid>) -> AppResult<Vec<Sale>>;

    async fn delete_sale(&self, sale_id: Uuid) -> AppResult<bool>;

    async fn insert_notification(&self, notification: &NewNotification)
        -> AppResult<Notification>;

    /// Newest first
    async fn list_notifications(&self) -> AppResult<Vec<Notification>>;

    async fn get_notification(&self, notification_id: Uuid) -> AppResult<Option<Notification>>;

    async fn set_notification_read(&self, notification_id: Uuid, read: bool)
        -> AppResult<Option<Notification>>;

    async fn delete_notification(&self, notification_id: Uuid) -> AppResult<bool>;
}
