//! Route definitions for the POS back office

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(product_routes())
        .merge(customer_routes())
        .merge(adjustment_routes())
        .merge(purchase_order_routes())
        .merge(sale_routes())
        .merge(notification_routes())
}

/// Product catalogue routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/create-product", post(handlers::create_product))
        .route("/products", get(handlers::list_products))
        .route(
            "/product/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/create-customer", post(handlers::create_customer))
        .route("/customers", get(handlers::list_customers))
        .route("/customer/:id", get(handlers::get_customer))
}

/// Stock adjustment routes
fn adjustment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-adjustment", post(handlers::create_adjustment))
        .route("/adjustment", get(handlers::list_adjustments))
        .route("/adjustment/:id", get(handlers::get_adjustment))
        .route("/update-adjustment/:id", put(handlers::update_adjustment))
        .route("/delete-adjustment/:id", delete(handlers::delete_adjustment))
}

/// Purchase order routes
fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-order", post(handlers::create_purchase_order))
        .route("/purchases", get(handlers::list_purchase_orders))
        .route("/purchase/:id", get(handlers::get_purchase_order))
}

/// Sale and sales summary routes
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/create-sale", post(handlers::create_sale))
        .route("/sales", get(handlers::list_sales))
        .route("/sales/all-shop", get(handlers::all_shops_sales_summary))
        .route("/sales/shop/:shop_id", get(handlers::shop_sales_summary))
        .route(
            "/sale/:id",
            get(handlers::get_sale).delete(handlers::delete_sale),
        )
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/create-notification", post(handlers::create_notification))
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notification/:id",
            get(handlers::get_notification)
                .patch(handlers::mark_notification)
                .delete(handlers::delete_notification),
        )
}
