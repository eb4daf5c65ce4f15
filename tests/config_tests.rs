//! Configuration loading and its effect on the running service

mod common;

use common::*;
use omis::prelude::*;
use serde_json::Value;
use std::io::Write;

const STOCK_ONLY: &str = r#"
server:
  api_prefix: /api/v2
ordering:
  order_mode: stock
  default_daily_limit: 25
discount:
  tiers:
    - { minimum_amount: 0, discount_percentage: 0 }
    - { minimum_amount: 100, discount_percentage: 10 }
"#;

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(STOCK_ONLY);
    let config = OmisConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.server.api_prefix, "/api/v2");
    assert_eq!(config.server.bind, "127.0.0.1:3000");
    assert_eq!(config.ordering.order_mode, OrderMode::Stock);
    assert_eq!(config.ordering.default_daily_limit, Some(25));
    assert_eq!(config.discount.tiers.len(), 2);
    assert_eq!(config.events.capacity, 1024);
}

#[test]
fn test_missing_file_is_reported() {
    let err = OmisConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn test_unsorted_tiers_are_rejected() {
    let file = write_config(
        r#"
discount:
  tiers:
    - { minimum_amount: 500, discount_percentage: 1 }
    - { minimum_amount: 100, discount_percentage: 2 }
"#,
    );
    assert!(OmisConfig::from_yaml_file(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_merge_keeps_later_overrides() {
    let base = OmisConfig::from_yaml_str("ordering: { order_mode: open }").unwrap();
    let overlay = OmisConfig::from_yaml_str("events: { capacity: 16 }").unwrap();

    let merged = OmisConfig::merge(vec![base, overlay]);
    assert_eq!(merged.ordering.order_mode, OrderMode::Open);
    assert_eq!(merged.events.capacity, 16);
}

#[tokio::test]
async fn test_configured_rules_drive_the_cart() {
    let file = write_config(STOCK_ONLY);
    let config = OmisConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();
    let server = server_with(config);
    let staff = Tenant::staff();
    let customer = Tenant::customer();

    let product: Value = staff
        .sign(server.post("/api/v2/products"))
        .json(&serde_json::json!({
            "name": "Rolac 10",
            "manufacturer": "Renata",
            "trade_price": 10.0,
            "minimum_order_quantity": 1,
        }))
        .await
        .json();
    let stock: Value = staff
        .sign(server.post("/api/v2/stocks"))
        .json(&serde_json::json!({
            "product_id": product["id"],
            "store_point_id": Uuid::new_v4(),
            "orderable_quantity": 20,
        }))
        .await
        .json();

    // daily limit caps 40 to 25, stock mode serves 20 and drops the rest
    let cart: Value = customer
        .sign(server.put(&format!(
            "/api/v2/cart/items/{}",
            stock["id"].as_str().unwrap()
        )))
        .json(&serde_json::json!({ "quantity": 40 }))
        .await
        .json();
    assert_eq!(cart["regular_units"], 20);
    assert_eq!(cart["pre_order_units"], 0);
    assert_eq!(cart["items"][0]["adjustments"][0]["kind"], "capped_by_daily_limit");
    assert_eq!(cart["items"][0]["adjustments"][1]["kind"], "limited_by_stock");
    assert_eq!(cart["discount"]["discount_percentage"], 10.0);
    assert_eq!(cart["grand_total"], 180.0);
}
