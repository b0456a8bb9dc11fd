//! In-process store with the same all-or-nothing semantics as PostgreSQL
//!
//! A unit of work takes the store lock, mutates a private copy of the
//! tables and swaps it in on commit. Dropping the unit of work discards the
//! copy. Writers are therefore fully serialised, which is what a single
//! back-office process needs for local runs and for the test suite.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{
    Adjustment, AdjustmentItem, AdjustmentWithItems, Customer, NewAdjustmentItem, NewCustomer,
    NewNotification, NewProduct, NewPurchaseOrder, NewPurchaseOrderItem, NewSale, NewSaleItem,
    Notification, Product, ProductChanges, PurchaseOrder, PurchaseOrderItem, PurchaseOrderWithItems, Sale, SaleItem,
    SaleWithItems, Shop, Supplier,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, UnitOfWork};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: Vec<Product>,
    customers: Vec<Customer>,
    suppliers: Vec<Supplier>,
    shops: Vec<Shop>,
    notifications: Vec<Notification>,
    adjustments: Vec<Adjustment>,
    adjustment_items: Vec<AdjustmentItem>,
    purchase_orders: Vec<PurchaseOrder>,
    purchase_order_items: Vec<PurchaseOrderItem>,
    sales: Vec<Sale>,
    sale_items: Vec<SaleItem>,
    notifications_unavailable: bool,
}

/// Row counts per table, for asserting that nothing leaked from a rolled
/// back unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSizes {
    pub notifications: usize,
    pub adjustments: usize,
    pub adjustment_items: usize,
    pub purchase_orders: usize,
    pub purchase_order_items: usize,
    pub sales: usize,
    pub sale_items: usize,
}

impl Tables {
    fn insert_notification(&mut self, notification: &NewNotification) -> AppResult<Notification> {
        if self.notifications_unavailable {
            return Err(AppError::Internal("notification table unavailable".to_string()));
        }
        let row = Notification {
            id: Uuid::new_v4(),
            message: notification.message.clone(),
            status_text: notification.status_text.clone(),
            status: notification.status,
            read: false,
            created_at: Utc::now(),
        };
        self.notifications.push(row.clone());
        Ok(row)
    }

    fn adjustment_with_items(&self, adjustment: &Adjustment) -> AdjustmentWithItems {
        AdjustmentWithItems {
            adjustment: adjustment.clone(),
            items: self
                .adjustment_items
                .iter()
                .filter(|i| i.adjustment_id == adjustment.id)
                .cloned()
                .collect(),
        }
    }

    fn purchase_order_with_items(&self, order: &PurchaseOrder) -> AppResult<PurchaseOrderWithItems> {
        let supplier = self
            .suppliers
            .iter()
            .find(|s| s.id == order.supplier_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(format!("purchase order supplier {} missing", order.supplier_id))
            })?;
        Ok(PurchaseOrderWithItems {
            purchase_order: order.clone(),
            items: self
                .purchase_order_items
                .iter()
                .filter(|i| i.purchase_order_id == order.id)
                .cloned()
                .collect(),
            supplier,
        })
    }

    fn sale_with_items(&self, sale: &Sale) -> SaleWithItems {
        SaleWithItems {
            sale: sale.clone(),
            sales_item: self
                .sale_items
                .iter()
                .filter(|i| i.sale_id == sale.id)
                .cloned()
                .collect(),
        }
    }

    fn ensure_unique_ref(&self, ref_no: &str) -> AppResult<()> {
        let taken = self.adjustments.iter().any(|a| a.ref_no == ref_no)
            || self.purchase_orders.iter().any(|p| p.ref_no == ref_no)
            || self.sales.iter().any(|s| s.sale_number == ref_no);
        if taken {
            return Err(AppError::Conflict(format!("Reference {} already exists", ref_no)));
        }
        Ok(())
    }

    fn ensure_unique_sku(&self, sku: &str, except: Option<Uuid>) -> AppResult<()> {
        if self
            .products
            .iter()
            .any(|p| p.sku == sku && Some(p.id) != except)
        {
            return Err(AppError::Conflict(format!("Product with sku {} already exists", sku)));
        }
        Ok(())
    }

    fn product_in_use(&self, product_id: Uuid) -> bool {
        self.adjustment_items.iter().any(|i| i.product_id == product_id)
            || self.purchase_order_items.iter().any(|i| i.product_id == product_id)
            || self.sale_items.iter().any(|i| i.product_id == product_id)
    }
}

/// Shared in-memory store; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

/// Unit of work holding the store lock and a private working copy
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_product(
        &self,
        name: &str,
        stock_qty: i32,
        alert_qty: i32,
        price: Decimal,
    ) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sku: name.to_uppercase().replace(' ', "-"),
            stock_qty,
            alert_qty,
            price,
            buying_price: price,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.products.push(product.clone());
        product
    }

    pub async fn seed_customer(
        &self,
        name: &str,
        unpaid_credit_amount: Decimal,
        max_credit_limit: Decimal,
    ) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            phone: None,
            unpaid_credit_amount,
            max_credit_limit,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.customers.push(customer.clone());
        customer
    }

    pub async fn seed_supplier(&self, name: &str) -> Supplier {
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            phone: None,
            created_at: Utc::now(),
        };
        self.tables.lock().await.suppliers.push(supplier.clone());
        supplier
    }

    pub async fn seed_shop(&self, name: &str) -> Shop {
        let shop = Shop {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().await.shops.push(shop.clone());
        shop
    }

    /// Make every notification insert fail until switched back
    pub async fn set_notifications_unavailable(&self, unavailable: bool) {
        self.tables.lock().await.notifications_unavailable = unavailable;
    }

    pub async fn table_sizes(&self) -> TableSizes {
        let t = self.tables.lock().await;
        TableSizes {
            notifications: t.notifications.len(),
            adjustments: t.adjustments.len(),
            adjustment_items: t.adjustment_items.len(),
            purchase_orders: t.purchase_orders.len(),
            purchase_order_items: t.purchase_order_items.len(),
            sales: t.sales.len(),
            sale_items: t.sale_items.len(),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn apply_stock_delta(
        &mut self,
        product_id: Uuid,
        delta: i32,
    ) -> AppResult<Option<Product>> {
        let Some(product) = self.working.products.iter_mut().find(|p| p.id == product_id) else {
            return Ok(None);
        };
        product.stock_qty = product
            .stock_qty
            .checked_add(delta)
            .ok_or_else(|| AppError::stock_out_of_range(product_id))?;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn insert_notification(
        &mut self,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        self.working.insert_notification(notification)
    }

    async fn lock_customer(&mut self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self
            .working
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned())
    }

    async fn charge_customer_credit(
        &mut self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Customer> {
        let customer = self
            .working
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;
        let out_of_range = || AppError::Validation {
            field: "balanceAmount".to_string(),
            message: "Customer credit amount is out of range".to_string(),
        };
        let unpaid = customer
            .unpaid_credit_amount
            .checked_add(amount)
            .ok_or_else(out_of_range)?;
        let limit = customer
            .max_credit_limit
            .checked_sub(amount)
            .ok_or_else(out_of_range)?;
        customer.unpaid_credit_amount = unpaid;
        customer.max_credit_limit = limit;
        customer.updated_at = Utc::now();
        Ok(customer.clone())
    }

    async fn find_supplier(&mut self, supplier_id: Uuid) -> AppResult<Option<Supplier>> {
        Ok(self
            .working
            .suppliers
            .iter()
            .find(|s| s.id == supplier_id)
            .cloned())
    }

    async fn insert_adjustment(&mut self, ref_no: &str, reason: &str) -> AppResult<Adjustment> {
        self.working.ensure_unique_ref(ref_no)?;
        let now = Utc::now();
        let adjustment = Adjustment {
            id: Uuid::new_v4(),
            ref_no: ref_no.to_string(),
            reason: reason.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.working.adjustments.push(adjustment.clone());
        Ok(adjustment)
    }

    async fn update_adjustment_reason(
        &mut self,
        adjustment_id: Uuid,
        reason: &str,
    ) -> AppResult<Option<Adjustment>> {
        let Some(adjustment) = self
            .working
            .adjustments
            .iter_mut()
            .find(|a| a.id == adjustment_id)
        else {
            return Ok(None);
        };
        adjustment.reason = reason.to_string();
        adjustment.updated_at = Utc::now();
        Ok(Some(adjustment.clone()))
    }

    async fn adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<Vec<AdjustmentItem>> {
        Ok(self
            .working
            .adjustment_items
            .iter()
            .filter(|i| i.adjustment_id == adjustment_id)
            .cloned()
            .collect())
    }

    async fn delete_adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<u64> {
        let before = self.working.adjustment_items.len();
        self.working
            .adjustment_items
            .retain(|i| i.adjustment_id != adjustment_id);
        Ok((before - self.working.adjustment_items.len()) as u64)
    }

    async fn insert_adjustment_item(
        &mut self,
        item: &NewAdjustmentItem,
    ) -> AppResult<AdjustmentItem> {
        let row = AdjustmentItem {
            id: Uuid::new_v4(),
            adjustment_id: item.adjustment_id,
            product_id: item.product_id,
            quantity: item.quantity,
            adjustment_type: item.adjustment_type,
            current_stock: item.current_stock,
            product_name: item.product_name.clone(),
            created_at: Utc::now(),
        };
        self.working.adjustment_items.push(row.clone());
        Ok(row)
    }

    async fn insert_purchase_order(&mut self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder> {
        self.working.ensure_unique_ref(&order.ref_no)?;
        let now = Utc::now();
        let row = PurchaseOrder {
            id: Uuid::new_v4(),
            ref_no: order.ref_no.clone(),
            supplier_id: order.supplier_id,
            discount: order.discount,
            notes: order.notes.clone(),
            tax: order.tax,
            total_amount: order.total_amount,
            balance_amount: order.balance_amount,
            shipping_cost: order.shipping_cost,
            status: order.status,
            created_at: now,
            updated_at: now,
        };
        self.working.purchase_orders.push(row.clone());
        Ok(row)
    }

    async fn insert_purchase_order_item(
        &mut self,
        item: &NewPurchaseOrderItem,
    ) -> AppResult<PurchaseOrderItem> {
        let row = PurchaseOrderItem {
            id: Uuid::new_v4(),
            purchase_order_id: item.purchase_order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            product_name: item.product_name.clone(),
            unit_cost: item.unit_cost,
            sub_total: item.sub_total,
            current_stock: item.current_stock,
            created_at: Utc::now(),
        };
        self.working.purchase_order_items.push(row.clone());
        Ok(row)
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> AppResult<Sale> {
        self.working.ensure_unique_ref(&sale.sale_number)?;
        let now = Utc::now();
        let row = Sale {
            id: Uuid::new_v4(),
            sale_number: sale.sale_number.clone(),
            customer_id: sale.customer_id,
            customer_name: sale.customer_name.clone(),
            customer_email: sale.customer_email.clone(),
            sale_amount: sale.sale_amount,
            balance_amount: sale.balance_amount,
            paid_amount: sale.paid_amount,
            status: sale.status,
            sale_type: sale.sale_type,
            payment_method: sale.payment_method,
            transaction_code: sale.transaction_code.clone(),
            shop_id: sale.shop_id,
            created_at: now,
            updated_at: now,
        };
        self.working.sales.push(row.clone());
        Ok(row)
    }

    async fn insert_sale_item(&mut self, item: &NewSaleItem) -> AppResult<SaleItem> {
        let row = SaleItem {
            id: Uuid::new_v4(),
            sale_id: item.sale_id,
            product_id: item.product_id,
            qty: item.qty,
            product_price: item.product_price,
            product_name: item.product_name.clone(),
            product_image: item.product_image.clone(),
            created_at: Utc::now(),
        };
        self.working.sale_items.push(row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_product(&self, product: &NewProduct) -> AppResult<Product> {
        let mut t = self.tables.lock().await;
        t.ensure_unique_sku(&product.sku, None)?;
        let now = Utc::now();
        let row = Product {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            stock_qty: product.stock_qty,
            alert_qty: product.alert_qty,
            price: product.price,
            buying_price: product.buying_price,
            created_at: now,
            updated_at: now,
        };
        t.products.push(row.clone());
        Ok(row)
    }

    async fn get_product(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        let t = self.tables.lock().await;
        Ok(t.products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn find_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let t = self.tables.lock().await;
        Ok(t.products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let t = self.tables.lock().await;
        Ok(t.products.iter().rev().cloned().collect())
    }

    async fn update_product(
        &self,
        product_id: Uuid,
        changes: &ProductChanges,
    ) -> AppResult<Option<Product>> {
        let mut t = self.tables.lock().await;
        if let Some(sku) = &changes.sku {
            t.ensure_unique_sku(sku, Some(product_id))?;
        }
        let Some(product) = t.products.iter_mut().find(|p| p.id == product_id) else {
            return Ok(None);
        };
        changes.apply_to(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, product_id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.lock().await;
        if t.product_in_use(product_id) {
            return Err(AppError::Conflict(
                "Product is referenced by recorded transactions".to_string(),
            ));
        }
        let before = t.products.len();
        t.products.retain(|p| p.id != product_id);
        Ok(t.products.len() < before)
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> AppResult<Customer> {
        let mut t = self.tables.lock().await;
        let taken = t.customers.iter().any(|c| {
            (customer.email.is_some() && c.email == customer.email)
                || (customer.phone.is_some() && c.phone == customer.phone)
        });
        if taken {
            return Err(AppError::Conflict("Customer already exists".to_string()));
        }
        let now = Utc::now();
        let row = Customer {
            id: Uuid::new_v4(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            unpaid_credit_amount: Decimal::ZERO,
            max_credit_limit: customer.max_credit_limit,
            created_at: now,
            updated_at: now,
        };
        t.customers.push(row.clone());
        Ok(row)
    }

    async fn get_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        let t = self.tables.lock().await;
        Ok(t.customers.iter().find(|c| c.id == customer_id).cloned())
    }

    async fn get_shop(&self, shop_id: Uuid) -> AppResult<Option<Shop>> {
        let t = self.tables.lock().await;
        Ok(t.shops.iter().find(|s| s.id == shop_id).cloned())
    }

    async fn get_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<AdjustmentWithItems>> {
        let t = self.tables.lock().await;
        Ok(t.adjustments
            .iter()
            .find(|a| a.id == adjustment_id)
            .map(|a| t.adjustment_with_items(a)))
    }

    async fn list_adjustments(&self) -> AppResult<Vec<AdjustmentWithItems>> {
        let t = self.tables.lock().await;
        Ok(t.adjustments
            .iter()
            .rev()
            .map(|a| t.adjustment_with_items(a))
            .collect())
    }

    async fn delete_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<Adjustment>> {
        let mut t = self.tables.lock().await;
        let Some(pos) = t.adjustments.iter().position(|a| a.id == adjustment_id) else {
            return Ok(None);
        };
        let adjustment = t.adjustments.remove(pos);
        t.adjustment_items.retain(|i| i.adjustment_id != adjustment_id);
        Ok(Some(adjustment))
    }

    async fn get_purchase_order(
        &self,
        order_id: Uuid,
    ) -> AppResult<Option<PurchaseOrderWithItems>> {
        let t = self.tables.lock().await;
        t.purchase_orders
            .iter()
            .find(|p| p.id == order_id)
            .map(|p| t.purchase_order_with_items(p))
            .transpose()
    }

    async fn list_purchase_orders(&self) -> AppResult<Vec<PurchaseOrderWithItems>> {
        let t = self.tables.lock().await;
        t.purchase_orders
            .iter()
            .rev()
            .map(|p| t.purchase_order_with_items(p))
            .collect()
    }

    async fn get_sale(&self, sale_id: Uuid) -> AppResult<Option<SaleWithItems>> {
        let t = self.tables.lock().await;
        Ok(t.sales
            .iter()
            .find(|s| s.id == sale_id)
            .map(|s| t.sale_with_items(s)))
    }

    async fn list_sales(&self) -> AppResult<Vec<SaleWithItems>> {
        let t = self.tables.lock().await;
        Ok(t.sales.iter().rev().map(|s| t.sale_with_items(s)).collect())
    }

    async fn sale_headers(&self, shop_id: Option<Uuid>) -> AppResult<Vec<Sale>> {
        let t = self.tables.lock().await;
        Ok(t.sales
            .iter()
            .rev()
            .filter(|s| shop_id.map_or(true, |id| s.shop_id == id))
            .cloned()
            .collect())
    }

    async fn delete_sale(&self, sale_id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.lock().await;
        let before = t.sales.len();
        t.sales.retain(|s| s.id != sale_id);
        if t.sales.len() == before {
            return Ok(false);
        }
        t.sale_items.retain(|i| i.sale_id != sale_id);
        Ok(true)
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        self.tables.lock().await.insert_notification(notification)
    }

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let t = self.tables.lock().await;
        Ok(t.customers
            .iter()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_customer_by_phone(&self, phone: &str) -> AppResult<Option<Customer>> {
        let t = self.tables.lock().await;
        Ok(t.customers
            .iter()
            .find(|c| c.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let t = self.tables.lock().await;
        Ok(t.customers.iter().rev().cloned().collect())
    }

    async fn list_notifications(&self) -> AppResult<Vec<Notification>> {
        let t = self.tables.lock().await;
        Ok(t.notifications.iter().rev().cloned().collect())
    }

    async fn get_notification(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        let t = self.tables.lock().await;
        Ok(t.notifications
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn set_notification_read(
        &self,
        notification_id: Uuid,
        read: bool,
    ) -> AppResult<Option<Notification>> {
        let mut t = self.tables.lock().await;
        let Some(notification) = t.notifications.iter_mut().find(|n| n.id == notification_id)
        else {
            return Ok(None);
        };
        notification.read = read;
        Ok(Some(notification.clone()))
    }

    async fn delete_notification(&self, notification_id: Uuid) -> AppResult<bool> {
        let mut t = self.tables.lock().await;
        let before = t.notifications.len();
        t.notifications.retain(|n| n.id != notification_id);
        Ok(t.notifications.len() != before)
    }
}
