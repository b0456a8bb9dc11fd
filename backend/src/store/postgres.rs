//! PostgreSQL store backed by a sqlx pool
//!
//! Stock deltas are applied with a single `UPDATE ... SET stock_qty =
//! stock_qty + $1 RETURNING` so concurrent writers serialise on the row lock
//! instead of racing a read-modify-write.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{
    Adjustment, AdjustmentItem, AdjustmentWithItems, Customer, NewAdjustmentItem, NewCustomer,
    NewNotification, NewProduct, NewPurchaseOrder, NewPurchaseOrderItem, NewSale, NewSaleItem,
    Notification, Product, ProductChanges, PurchaseOrder, PurchaseOrderItem, PurchaseOrderWithItems, Sale, SaleItem,
    SaleWithItems, Shop, Supplier,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{Store, UnitOfWork};
use crate::error::{AppError, AppResult};

/// SQLSTATE `numeric_value_out_of_range`
const NUMERIC_OUT_OF_RANGE: &str = "22003";
/// SQLSTATE `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

const PRODUCT_COLUMNS: &str =
    "id, name, sku, stock_qty, alert_qty, price, buying_price, created_at, updated_at";
const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, unpaid_credit_amount, max_credit_limit, created_at, updated_at";
const SUPPLIER_COLUMNS: &str = "id, name, email, phone, created_at";
const NOTIFICATION_COLUMNS: &str = "id, message, status_text, status, read, created_at";
const ADJUSTMENT_COLUMNS: &str = "id, ref_no, reason, created_at, updated_at";
const ADJUSTMENT_ITEM_COLUMNS: &str =
    "id, adjustment_id, product_id, quantity, adjustment_type, current_stock, product_name, created_at";
const PURCHASE_ORDER_COLUMNS: &str = "id, ref_no, supplier_id, discount, notes, tax, total_amount, \
     balance_amount, shipping_cost, status, created_at, updated_at";
const PURCHASE_ORDER_ITEM_COLUMNS: &str = "id, purchase_order_id, product_id, quantity, \
     product_name, unit_cost, sub_total, current_stock, created_at";
const SALE_COLUMNS: &str = "id, sale_number, customer_id, customer_name, customer_email, \
     sale_amount, balance_amount, paid_amount, status, sale_type, payment_method, \
     transaction_code, shop_id, created_at, updated_at";
const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, product_id, qty, product_price, product_name, product_image, created_at";

/// Store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("purchase order supplier {} missing", supplier_id)))
    }
}

/// Unit of work over one sqlx transaction; rolled back on drop
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn apply_stock_delta(
        &mut self,
        product_id: Uuid,
        delta: i32,
    ) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock_qty = stock_qty + $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(delta)
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db)
                if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) =>
            {
                AppError::stock_out_of_range(product_id)
            }
            other => other.into(),
        })?;

        Ok(product)
    }

    async fn insert_notification(
        &mut self,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (message, status_text, status)
            VALUES ($1, $2, $3)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(&notification.message)
        .bind(&notification.status_text)
        .bind(notification.status)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn lock_customer(&mut self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 FOR UPDATE"
        ))
        .bind(customer_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(customer)
    }

    async fn charge_customer_credit(
        &mut self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET unpaid_credit_amount = unpaid_credit_amount + $1,
                max_credit_limit = max_credit_limit - $1,
                updated_at = NOW()
            WHERE id = $2
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(amount)
        .bind(customer_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    async fn find_supplier(&mut self, supplier_id: Uuid) -> AppResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(supplier_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(supplier)
    }

    async fn insert_adjustment(&mut self, ref_no: &str, reason: &str) -> AppResult<Adjustment> {
        let adjustment = sqlx::query_as::<_, Adjustment>(&format!(
            r#"
            INSERT INTO adjustments (ref_no, reason)
            VALUES ($1, $2)
            RETURNING {ADJUSTMENT_COLUMNS}
            "#
        ))
        .bind(ref_no)
        .bind(reason)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(adjustment)
    }

    async fn update_adjustment_reason(
        &mut self,
        adjustment_id: Uuid,
        reason: &str,
    ) -> AppResult<Option<Adjustment>> {
        let adjustment = sqlx::query_as::<_, Adjustment>(&format!(
            r#"
            UPDATE adjustments
            SET reason = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {ADJUSTMENT_COLUMNS}
            "#
        ))
        .bind(reason)
        .bind(adjustment_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(adjustment)
    }

    async fn adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<Vec<AdjustmentItem>> {
        let items = sqlx::query_as::<_, AdjustmentItem>(&format!(
            "SELECT {ADJUSTMENT_ITEM_COLUMNS} FROM adjustment_items WHERE adjustment_id = $1 ORDER BY seq"
        ))
        .bind(adjustment_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(items)
    }

    async fn delete_adjustment_items(&mut self, adjustment_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM adjustment_items WHERE adjustment_id = $1")
            .bind(adjustment_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_adjustment_item(
        &mut self,
        item: &NewAdjustmentItem,
    ) -> AppResult<AdjustmentItem> {
        let row = sqlx::query_as::<_, AdjustmentItem>(&format!(
            r#"
            INSERT INTO adjustment_items (
                adjustment_id, product_id, quantity, adjustment_type, current_stock, product_name
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADJUSTMENT_ITEM_COLUMNS}
            "#
        ))
        .bind(item.adjustment_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.adjustment_type)
        .bind(item.current_stock)
        .bind(&item.product_name)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_purchase_order(&mut self, order: &NewPurchaseOrder) -> AppResult<PurchaseOrder> {
        let row = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            INSERT INTO purchase_orders (
                ref_no, supplier_id, discount, notes, tax, total_amount,
                balance_amount, shipping_cost, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PURCHASE_ORDER_COLUMNS}
            "#
        ))
        .bind(&order.ref_no)
        .bind(order.supplier_id)
        .bind(order.discount)
        .bind(&order.notes)
        .bind(order.tax)
        .bind(order.total_amount)
        .bind(order.balance_amount)
        .bind(order.shipping_cost)
        .bind(order.status)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_purchase_order_item(
        &mut self,
        item: &NewPurchaseOrderItem,
    ) -> AppResult<PurchaseOrderItem> {
        let row = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            r#"
            INSERT INTO purchase_order_items (
                purchase_order_id, product_id, quantity, product_name,
                unit_cost, sub_total, current_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PURCHASE_ORDER_ITEM_COLUMNS}
            "#
        ))
        .bind(item.purchase_order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(&item.product_name)
        .bind(item.unit_cost)
        .bind(item.sub_total)
        .bind(item.current_stock)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> AppResult<Sale> {
        let row = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (
                sale_number, customer_id, customer_name, customer_email, sale_amount,
                balance_amount, paid_amount, status, sale_type, payment_method,
                transaction_code, shop_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(&sale.sale_number)
        .bind(sale.customer_id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_email)
        .bind(sale.sale_amount)
        .bind(sale.balance_amount)
        .bind(sale.paid_amount)
        .bind(sale.status)
        .bind(sale.sale_type)
        .bind(sale.payment_method)
        .bind(&sale.transaction_code)
        .bind(sale.shop_id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_sale_item(&mut self, item: &NewSaleItem) -> AppResult<SaleItem> {
        let row = sqlx::query_as::<_, SaleItem>(&format!(
            r#"
            INSERT INTO sale_items (
                sale_id, product_id, qty, product_price, product_name, product_image
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SALE_ITEM_COLUMNS}
            "#
        ))
        .bind(item.sale_id)
        .bind(item.product_id)
        .bind(item.qty)
        .bind(item.product_price)
        .bind(&item.product_name)
        .bind(&item.product_image)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

/// Map a constraint violation with SQLSTATE `code` to `Conflict`
fn conflict_on(code: &'static str, message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db) if db.code().as_deref() == Some(code) => {
            AppError::Conflict(message.to_string())
        }
        other => other.into(),
    }
}

fn group_by<K, T>(rows: Vec<T>, key: impl Fn(&T) -> K) -> HashMap<K, Vec<T>>
where
    K: std::hash::Hash + Eq,
{
    let mut grouped: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn insert_product(&self, product: &NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, sku, stock_qty, alert_qty, price, buying_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.stock_qty)
        .bind(product.alert_qty)
        .bind(product.price)
        .bind(product.buying_price)
        .fetch_one(&self.db)
        .await
        .map_err(conflict_on(UNIQUE_VIOLATION, "Product sku already exists"))?;

        Ok(row)
    }

    async fn get_product(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    async fn find_product_by_sku(&self, sku: &str) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1"
        ))
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn update_product(
        &self,
        product_id: Uuid,
        changes: &ProductChanges,
    ) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($1, name),
                sku = COALESCE($2, sku),
                alert_qty = COALESCE($3, alert_qty),
                price = COALESCE($4, price),
                buying_price = COALESCE($5, buying_price),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&changes.name)
        .bind(&changes.sku)
        .bind(changes.alert_qty)
        .bind(changes.price)
        .bind(changes.buying_price)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await
        .map_err(conflict_on(UNIQUE_VIOLATION, "Product sku already exists"))?;

        Ok(row)
    }

    async fn delete_product(&self, product_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await
            .map_err(conflict_on(
                FOREIGN_KEY_VIOLATION,
                "Product is referenced by recorded transactions",
            ))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, email, phone, max_credit_limit)
            VALUES ($1, $2, $3, $4)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.max_credit_limit)
        .fetch_one(&self.db)
        .await
        .map_err(conflict_on(UNIQUE_VIOLATION, "Customer already exists"))?;

        Ok(row)
    }

    async fn get_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(customer)
    }

    async fn find_customer_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(customer)
    }

    async fn find_customer_by_phone(&self, phone: &str) -> AppResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.db)
        .await?;

        Ok(customer)
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get_shop(&self, shop_id: Uuid) -> AppResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>("SELECT id, name, created_at FROM shops WHERE id = $1")
            .bind(shop_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(shop)
    }

    async fn get_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<AdjustmentWithItems>> {
        let Some(adjustment) = sqlx::query_as::<_, Adjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM adjustments WHERE id = $1"
        ))
        .bind(adjustment_id)
        .fetch_optional(&self.db)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, AdjustmentItem>(&format!(
            "SELECT {ADJUSTMENT_ITEM_COLUMNS} FROM adjustment_items WHERE adjustment_id = $1 ORDER BY seq"
        ))
        .bind(adjustment_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(AdjustmentWithItems { adjustment, items }))
    }

    async fn list_adjustments(&self) -> AppResult<Vec<AdjustmentWithItems>> {
        let headers = sqlx::query_as::<_, Adjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM adjustments ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, AdjustmentItem>(&format!(
            "SELECT {ADJUSTMENT_ITEM_COLUMNS} FROM adjustment_items ORDER BY seq"
        ))
        .fetch_all(&self.db)
        .await?;
        let mut items = group_by(items, |i| i.adjustment_id);

        Ok(headers
            .into_iter()
            .map(|adjustment| AdjustmentWithItems {
                items: items.remove(&adjustment.id).unwrap_or_default(),
                adjustment,
            })
            .collect())
    }

    async fn delete_adjustment(&self, adjustment_id: Uuid) -> AppResult<Option<Adjustment>> {
        // Items go with the header through ON DELETE CASCADE
        let adjustment = sqlx::query_as::<_, Adjustment>(&format!(
            "DELETE FROM adjustments WHERE id = $1 RETURNING {ADJUSTMENT_COLUMNS}"
        ))
        .bind(adjustment_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(adjustment)
    }

    async fn get_purchase_order(
        &self,
        order_id: Uuid,
    ) -> AppResult<Option<PurchaseOrderWithItems>> {
        let Some(purchase_order) = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {PURCHASE_ORDER_COLUMNS} FROM purchase_orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {PURCHASE_ORDER_ITEM_COLUMNS} FROM purchase_order_items WHERE purchase_order_id = $1 ORDER BY seq"
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let supplier = self.supplier(purchase_order.supplier_id).await?;

        Ok(Some(PurchaseOrderWithItems {
            purchase_order,
            items,
            supplier,
        }))
    }

    async fn list_purchase_orders(&self) -> AppResult<Vec<PurchaseOrderWithItems>> {
        let headers = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {PURCHASE_ORDER_COLUMNS} FROM purchase_orders ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {PURCHASE_ORDER_ITEM_COLUMNS} FROM purchase_order_items ORDER BY seq"
        ))
        .fetch_all(&self.db)
        .await?;
        let mut items = group_by(items, |i| i.purchase_order_id);

        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id IN (SELECT supplier_id FROM purchase_orders)"
        ))
        .fetch_all(&self.db)
        .await?;
        let suppliers: HashMap<Uuid, Supplier> =
            suppliers.into_iter().map(|s| (s.id, s)).collect();

        headers
            .into_iter()
            .map(|purchase_order| -> AppResult<PurchaseOrderWithItems> {
                let supplier = suppliers
                    .get(&purchase_order.supplier_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "purchase order supplier {} missing",
                            purchase_order.supplier_id
                        ))
                    })?;
                Ok(PurchaseOrderWithItems {
                    items: items.remove(&purchase_order.id).unwrap_or_default(),
                    purchase_order,
                    supplier,
                })
            })
            .collect()
    }

    async fn get_sale(&self, sale_id: Uuid) -> AppResult<Option<SaleWithItems>> {
        let Some(sale) = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        else {
            return Ok(None);
        };

        let sales_item = sqlx::query_as::<_, SaleItem>(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = $1 ORDER BY seq"
        ))
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Some(SaleWithItems { sale, sales_item }))
    }

    async fn list_sales(&self) -> AppResult<Vec<SaleWithItems>> {
        let headers = self.sale_headers(None).await?;

        let items = sqlx::query_as::<_, SaleItem>(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items ORDER BY seq"
        ))
        .fetch_all(&self.db)
        .await?;
        let mut items = group_by(items, |i| i.sale_id);

        Ok(headers
            .into_iter()
            .map(|sale| SaleWithItems {
                sales_item: items.remove(&sale.id).unwrap_or_default(),
                sale,
            })
            .collect())
    }

    async fn sale_headers(&self, shop_id: Option<Uuid>) -> AppResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE ($1::uuid IS NULL OR shop_id = $1)
            ORDER BY created_at DESC, seq DESC
            "#
        ))
        .bind(shop_id)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }

    async fn delete_sale(&self, sale_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (message, status_text, status)
            VALUES ($1, $2, $3)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(&notification.message)
        .bind(&notification.status_text)
        .bind(notification.status)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn list_notifications(&self) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC, seq DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn get_notification(&self, notification_id: Uuid) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(notification_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn set_notification_read(
        &self,
        notification_id: Uuid,
        read: bool,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications SET read = $1 WHERE id = $2 RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(read)
        .bind(notification_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete_notification(&self, notification_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
