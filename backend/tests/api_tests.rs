//! HTTP surface tests
//!
//! Drives the router with `oneshot` against the in-memory store and checks
//! status codes and the `{data, error}` envelope.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::*;
use pos_backoffice::{create_app, AppState, MemoryStore};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app(memory: &MemoryStore) -> Router {
    create_app(AppState::new(
        Arc::new(memory.clone()),
        test_config(inventory()),
    ))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let memory = MemoryStore::new();
    let (status, body) = send(app(&memory), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");

    let (status, _) = send(app(&memory), "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_adjustment_envelope() {
    let memory = MemoryStore::new();
    let product = memory.seed_product("Sugar", 10, 5, dec!(3)).await;

    let (status, body) = send(
        app(&memory),
        "POST",
        "/api/v1/create-adjustment",
        Some(json!({
            "reason": "Damaged",
            "items": [{
                "productId": product.id,
                "quantity": 10,
                "type": "Subtraction",
                "currentStock": 10,
                "productName": "Sugar"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_null());
    assert_eq!(body["data"]["reason"], "Damaged");
    assert_eq!(body["data"]["items"][0]["type"], "Subtraction");
    assert_eq!(body["data"]["items"][0]["currentStock"], 10);

    let (status, body) = send(app(&memory), "GET", "/api/v1/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["notifications"][0]["status"], "DANGER");
    assert_eq!(body["data"]["notifications"][0]["statusText"], "Stock Out");

    let (_, body) = send(app(&memory), "GET", "/api/v1/adjustment", None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["adjustments"][0]["reason"], "Damaged");
}

#[tokio::test]
async fn test_invalid_adjustment_type_is_400() {
    let memory = MemoryStore::new();
    let product = memory.seed_product("Sugar", 10, 5, dec!(3)).await;

    let (status, body) = send(
        app(&memory),
        "POST",
        "/api/v1/create-adjustment",
        Some(json!({
            "reason": "Typo",
            "items": [{
                "productId": product.id,
                "quantity": 1,
                "type": "Shrink",
                "currentStock": 10,
                "productName": "Sugar"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_product_is_404() {
    let memory = MemoryStore::new();

    let (status, body) = send(
        app(&memory),
        "POST",
        "/api/v1/create-adjustment",
        Some(json!({
            "reason": "Recount",
            "items": [{
                "productId": Uuid::new_v4(),
                "quantity": 1,
                "type": "Addition",
                "currentStock": 0,
                "productName": "Ghost"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_malformed_body_keeps_the_envelope() {
    let memory = MemoryStore::new();

    let (status, body) = send(
        app(&memory),
        "POST",
        "/api/v1/create-adjustment",
        Some(json!({
            "reason": "Recount",
            "items": [{
                "productId": "not-a-uuid",
                "quantity": 1,
                "type": "Addition",
                "currentStock": 0,
                "productName": "Sugar"
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field"], "body");

    let (status, body) = send(app(&memory), "POST", "/api/v1/create-sale", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"].is_null());
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_id_keeps_the_envelope() {
    let memory = MemoryStore::new();

    for (method, uri) in [
        ("GET", "/api/v1/adjustment/not-a-uuid"),
        ("DELETE", "/api/v1/sale/42"),
        ("GET", "/api/v1/sales/shop/main-street"),
    ] {
        let (status, body) = send(app(&memory), method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(body["data"].is_null());
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field"], "id");
    }
}

#[tokio::test]
async fn test_purchase_order_round_trip() {
    let memory = MemoryStore::new();
    let product = memory.seed_product("Coffee", 5, 50, dec!(9)).await;
    let supplier = memory.seed_supplier("Highland Roasters").await;

    let (status, body) = send(
        app(&memory),
        "POST",
        "/api/v1/purchase-order",
        Some(json!({
            "supplierId": supplier.id,
            "discount": "0",
            "notes": null,
            "tax": "0",
            "totalAmount": "130",
            "balanceAmount": "0",
            "shippingCost": "0",
            "status": "PAID",
            "items": [{
                "productId": product.id,
                "quantity": 20,
                "productName": "Coffee",
                "unitCost": "6.5",
                "subTotal": "130",
                "currentStock": 5
            }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["supplier"]["name"], "Highland Roasters");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(stock_of(&memory, product.id).await, 25);

    let (status, fetched) = send(app(&memory), "GET", &format!("/api/v1/purchase/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], body["data"]);

    let (_, list) = send(app(&memory), "GET", "/api/v1/purchases", None).await;
    assert_eq!(list["data"]["total"], 1);
    assert_eq!(list["data"]["purchaseOrders"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_create_sale_is_201_and_credit_limit_is_403() {
    let memory = MemoryStore::new();
    let shop = memory.seed_shop("Main Street").await;
    let product = memory.seed_product("Bread", 20, 5, dec!(2)).await;
    let customer = memory.seed_customer("Amina", dec!(0), dec!(5)).await;

    let body = |balance: &str, paid: &str| {
        json!({
            "customerId": customer.id,
            "customerName": "Amina",
            "customerEmail": "amina@example.com",
            "saleAmount": "10",
            "balanceAmount": balance,
            "paidAmount": paid,
            "status": "DELIVERED",
            "saleType": "CREDIT",
            "paymentMethod": "CASH",
            "transactionCode": null,
            "shopId": shop.id,
            "salesItem": [{
                "productId": product.id,
                "qty": 5,
                "productPrice": "2",
                "productName": "Bread",
                "productImage": null
            }]
        })
    };

    let (status, created) =
        send(app(&memory), "POST", "/api/v1/create-sale", Some(body("4", "6"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["salesItem"][0]["qty"], 5);
    assert!(created["error"].is_null());

    let (status, rejected) =
        send(app(&memory), "POST", "/api/v1/create-sale", Some(body("6", "4"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(rejected["code"], "CREDIT_LIMIT_EXCEEDED");
    assert!(rejected["data"].is_null());
    assert_eq!(stock_of(&memory, product.id).await, 15);

    let (status, summary) = send(
        app(&memory),
        "GET",
        &format!("/api/v1/sales/shop/{}", shop.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["data"]["allTime"]["salesPaidInCredit"]
        .as_array()
        .unwrap()
        .len(), 1);

    let (status, everywhere) = send(app(&memory), "GET", "/api/v1/sales/all-shop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(everywhere["data"]["allTime"]["total"][0]["shopId"], json!(shop.id));

    let sale_id = created["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = send(app(&memory), "DELETE", &format!("/api/v1/sale/{}", sale_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(app(&memory), "GET", &format!("/api/v1/sale/{}", sale_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_routes() {
    let memory = MemoryStore::new();

    let (status, created) = send(
        app(&memory),
        "POST",
        "/api/v1/create-notification",
        Some(json!({"message": "Stocktake", "statusText": "Notice", "status": "INFO"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/notification/{}", created["data"]["id"].as_str().unwrap());

    let (status, marked) = send(app(&memory), "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["data"]["read"], true);

    let (status, _) = send(app(&memory), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(app(&memory), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Notification not found");
}

#[tokio::test]
async fn test_product_routes() {
    let memory = MemoryStore::new();
    let product = json!({
        "name": "Rice 5kg",
        "sku": "RICE-5",
        "stockQty": 40,
        "alertQty": 5,
        "price": "12.50",
        "buyingPrice": "9.00"
    });

    let (status, created) =
        send(app(&memory), "POST", "/api/v1/create-product", Some(product.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["stockQty"], 40);
    assert!(created["error"].is_null());

    let (status, body) = send(app(&memory), "POST", "/api/v1/create-product", Some(product)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["data"].is_null());

    let uri = format!("/api/v1/product/{}", created["data"]["id"].as_str().unwrap());
    let (status, updated) = send(
        app(&memory),
        "PUT",
        &uri,
        Some(json!({"name": "Rice 5kg Jasmine", "stockQty": 9999})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Rice 5kg Jasmine");
    assert_eq!(updated["data"]["stockQty"], 40);

    let (status, list) = send(app(&memory), "GET", "/api/v1/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"]["total"], 1);

    let (status, _) = send(app(&memory), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(app(&memory), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_customer_routes() {
    let memory = MemoryStore::new();
    let customer = json!({
        "name": "Amina",
        "email": "amina@example.com",
        "phone": "0700111222",
        "maxCreditLimit": "500"
    });

    let (status, created) =
        send(app(&memory), "POST", "/api/v1/create-customer", Some(customer.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["unpaidCreditAmount"], "0");

    let (status, body) =
        send(app(&memory), "POST", "/api/v1/create-customer", Some(customer)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"].is_null());

    let uri = format!("/api/v1/customer/{}", created["data"]["id"].as_str().unwrap());
    let (status, fetched) = send(app(&memory), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["phone"], "0700111222");

    let (status, list) = send(app(&memory), "GET", "/api/v1/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"]["total"], 1);

    let (status, _) =
        send(app(&memory), "GET", &format!("/api/v1/customer/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
