//! Tenant context and permission checks over HTTP

mod common;

use axum::http::{HeaderName, HeaderValue};
use common::*;
use serde_json::{Value, json};

#[tokio::test]
async fn test_missing_tenant_header_is_unauthorized() {
    let server = server();

    let response = server.get(&url("/cart")).await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_tenant_header_is_unauthorized() {
    let server = server();

    let response = server
        .get(&url("/orders"))
        .add_header(
            HeaderName::from_static("x-organization-id"),
            HeaderValue::from_static("pharmacy-42"),
        )
        .await;
    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_HEADER");
}

#[tokio::test]
async fn test_customers_cannot_write_catalog() {
    let server = server();
    let customer = Tenant::customer();

    let response = customer
        .sign(server.post(&url("/products")))
        .json(&json!({
            "name": "Seclo 20",
            "manufacturer": "Square",
            "trade_price": 5.0,
            "minimum_order_quantity": 1,
        }))
        .await;
    response.assert_status_forbidden();
    let body: Value = response.json();
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_orders_are_invisible_across_tenants() {
    let server = server();
    let staff = Tenant::staff();
    let alice = Tenant::customer();
    let bob = Tenant::customer();
    let stock_id = seed_stock(&server, &staff, 3.0, 1, 50).await;

    put_in_cart(&server, &alice, &stock_id, 5).await;
    let orders: Vec<Value> = alice
        .sign(server.post(&url("/orders/checkout")))
        .await
        .json();
    let order_url = url(&format!("/orders/{}", orders[0]["id"].as_str().unwrap()));

    bob.sign(server.get(&order_url)).await.assert_status_not_found();
    alice.sign(server.get(&order_url)).await.assert_status_ok();
    staff.sign(server.get(&order_url)).await.assert_status_ok();

    let listing: Value = bob.sign(server.get(&url("/orders"))).await.json();
    assert_eq!(listing["pagination"]["total"], 0);

    // bob cannot cancel alice's order either
    bob.sign(server.post(&format!("{}/status", order_url)))
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status_not_found();

    let bob_cart: Value = bob.sign(server.get(&url("/cart"))).await.json();
    assert!(bob_cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invoice_groups_only_take_own_orders() {
    let server = server();
    let staff = Tenant::staff();
    let alice = Tenant::customer();
    let bob = Tenant::customer();
    let stock_id = seed_stock(&server, &staff, 3.0, 1, 50).await;

    put_in_cart(&server, &alice, &stock_id, 5).await;
    let orders: Vec<Value> = alice
        .sign(server.post(&url("/orders/checkout")))
        .await
        .json();

    bob.sign(server.post(&url("/invoice-groups")))
        .json(&json!({ "order_ids": [orders[0]["id"]] }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_unpublished_products_hidden_from_customers() {
    let server = server();
    let staff = Tenant::staff();
    let customer = Tenant::customer();

    staff
        .sign(server.post(&url("/products")))
        .json(&json!({
            "name": "Maxpro 20",
            "manufacturer": "Renata",
            "trade_price": 7.0,
            "minimum_order_quantity": 1,
            "is_published": false,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let listing: Value = customer.sign(server.get(&url("/products"))).await.json();
    assert_eq!(listing["pagination"]["total"], 0);

    let listing: Value = staff.sign(server.get(&url("/products"))).await.json();
    assert_eq!(listing["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_product_soft_delete() {
    let server = server();
    let staff = Tenant::staff();

    let product: Value = staff
        .sign(server.post(&url("/products")))
        .json(&json!({
            "name": "Alatrol",
            "manufacturer": "Square",
            "trade_price": 3.0,
            "minimum_order_quantity": 1,
        }))
        .await
        .json();
    let product_url = url(&format!("/products/{}", product["id"].as_str().unwrap()));

    let updated: Value = staff
        .sign(server.put(&product_url))
        .json(&json!({ "trade_price": 3.5 }))
        .await
        .json();
    assert_eq!(updated["trade_price"], 3.5);

    staff
        .sign(server.delete(&product_url))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    staff.sign(server.get(&product_url)).await.assert_status_not_found();
}
