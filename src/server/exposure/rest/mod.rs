//! REST API exposure
//!
//! Consumes a [`ServerHost`] and produces the Axum router: health checks at
//! the root, every entity route nested under the configured API prefix.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// `custom_routes` are nested under the API prefix with the entity routes.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let api = custom_routes
            .into_iter()
            .fold(host.entity_registry.build_routes(), |api, routes| {
                api.merge(routes)
            });

        Self::health_routes()
            .nest(host.api_prefix(), api)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::entities::OrderingModule;
    use crate::server::ServerBuilder;
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn test_health_routes_need_no_tenant() {
        let app = ServerBuilder::new()
            .register_module(OrderingModule)
            .build()
            .unwrap();
        let server = TestServer::try_new(app).unwrap();

        for path in ["/health", "/healthz"] {
            let response = server.get(path).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["status"], "ok");
        }
    }

    #[tokio::test]
    async fn test_entity_routes_live_under_prefix() {
        let app = ServerBuilder::new()
            .register_module(OrderingModule)
            .build()
            .unwrap();
        let server = TestServer::try_new(app).unwrap();

        server
            .get("/api/v1/discounts/tiers")
            .await
            .assert_status_unauthorized();
        server.get("/discounts/tiers").await.assert_status_not_found();
    }
}
