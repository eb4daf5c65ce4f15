//! Shared helpers for HTTP integration tests

#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use omis::prelude::*;
use serde_json::{Value, json};

pub const API: &str = "/api/v1";

/// A caller identity sent through the tenant headers
#[derive(Debug, Clone, Copy)]
pub struct Tenant {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub roles: &'static str,
}

impl Tenant {
    pub fn customer() -> Self {
        Self {
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            roles: "",
        }
    }

    pub fn staff() -> Self {
        Self {
            roles: "staff",
            ..Self::customer()
        }
    }

    pub fn sign(&self, request: TestRequest) -> TestRequest {
        let request = request
            .add_header(
                HeaderName::from_static("x-organization-id"),
                header_value(&self.organization_id.to_string()),
            )
            .add_header(
                HeaderName::from_static("x-user-id"),
                header_value(&self.user_id.to_string()),
            );
        if self.roles.is_empty() {
            request
        } else {
            request.add_header(HeaderName::from_static("x-roles"), header_value(self.roles))
        }
    }
}

fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}

pub fn server_with(config: OmisConfig) -> TestServer {
    let app = ServerBuilder::new()
        .with_config(config)
        .register_module(OrderingModule)
        .build()
        .expect("Failed to build app");
    TestServer::try_new(app).expect("Failed to create test server")
}

pub fn server() -> TestServer {
    server_with(OmisConfig::default_config())
}

pub fn url(path: &str) -> String {
    format!("{}{}", API, path)
}

/// Create a product and a stock of `quantity` units as staff; returns the stock id
pub async fn seed_stock(
    server: &TestServer,
    staff: &Tenant,
    price: f64,
    moq: u32,
    quantity: u32,
) -> String {
    let product: Value = staff
        .sign(server.post(&url("/products")))
        .json(&json!({
            "name": "Napa Extra",
            "generic_name": "Paracetamol + Caffeine",
            "manufacturer": "Beximco",
            "trade_price": price,
            "minimum_order_quantity": moq,
        }))
        .await
        .json();

    let stock: Value = staff
        .sign(server.post(&url("/stocks")))
        .json(&json!({
            "product_id": product["id"],
            "store_point_id": Uuid::new_v4(),
            "orderable_quantity": quantity,
        }))
        .await
        .json();

    stock["id"].as_str().unwrap().to_string()
}

pub async fn put_in_cart(server: &TestServer, tenant: &Tenant, stock_id: &str, quantity: u32) -> Value {
    let response = tenant
        .sign(server.put(&url(&format!("/cart/items/{}", stock_id))))
        .json(&json!({ "quantity": quantity }))
        .await;
    response.assert_status_ok();
    response.json()
}

pub async fn orderable_quantity(server: &TestServer, tenant: &Tenant, stock_id: &str) -> u64 {
    let stock: Value = tenant
        .sign(server.get(&url(&format!("/stocks/{}", stock_id))))
        .await
        .json();
    stock["orderable_quantity"].as_u64().unwrap()
}

pub async fn set_status(server: &TestServer, tenant: &Tenant, order_id: &str, status: &str) {
    tenant
        .sign(server.post(&url(&format!("/orders/{}/status", order_id))))
        .json(&json!({ "status": status }))
        .await
        .assert_status_ok();
}
