use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};

use crate::core::middleware::{basic_auth, BasicAuth};
use crate::features::restrooms::handlers;
use crate::features::restrooms::services::RestroomService;

/// Create routes for the restroom catalog
///
/// `/api/banos` is kept for QR landing pages printed with the legacy path.
/// `PUT`/`DELETE` are only mounted when admin credentials are configured,
/// and require them as basic auth.
pub fn routes(service: Arc<RestroomService>, admin_credentials: Option<String>) -> Router {
    let item = get(handlers::get_restroom);
    let item = match admin_credentials {
        Some(credentials) => item.merge(
            put(handlers::upsert_restroom)
                .delete(handlers::delete_restroom)
                .route_layer(from_fn_with_state(
                    Arc::new(BasicAuth::new(credentials, "Restroom catalog")),
                    basic_auth,
                )),
        ),
        None => {
            tracing::info!("Restroom catalog is read-only (no admin credentials configured)");
            item
        }
    };

    Router::new()
        .route("/api/restrooms", get(handlers::list_restrooms))
        .route("/api/banos", get(handlers::list_restrooms))
        .route("/api/restrooms/{id}", item)
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;
    use base64::prelude::*;
    use serde_json::{json, Value};

    use crate::modules::store::ReportStore;
    use crate::shared::test_helpers::{new_report, seeded_store, QR_BASE_URL};

    async fn server() -> (TestServer, Arc<crate::modules::store::MemoryReportStore>) {
        let store = seeded_store().await;
        let service = Arc::new(RestroomService::new(store.clone(), QR_BASE_URL));
        let credentials = Some("ops:hunter2".to_string());
        (TestServer::new(routes(service, credentials)).unwrap(), store)
    }

    fn admin_auth() -> String {
        format!("Basic {}", BASE64_STANDARD.encode("ops:hunter2"))
    }

    #[tokio::test]
    async fn test_catalog_listing() {
        let (server, _) = server().await;

        let body: Value = server.get("/api/banos").await.json();
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["id"], "B-A1-H1");
        assert_eq!(body[0]["qrUrl"], format!("{}?r=B-A1-H1", QR_BASE_URL));

        let body: Value = server
            .get("/api/restrooms")
            .add_query_param("includeInactive", "true")
            .await
            .json();
        assert_eq!(body.as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_lookup_upsert_delete() {
        let (server, store) = server().await;

        server
            .get("/api/restrooms/B-OLD")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server
            .put("/api/restrooms/B-A3-U1")
            .add_header(header::AUTHORIZATION, admin_auth())
            .json(&json!({ "displayName": "Unisex Ala 3", "zone": "Ala 3", "floor": "3" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["active"], true);

        server.get("/api/restrooms/B-A3-U1").await.assert_status_ok();

        store.insert_report(&new_report("B-A3-U1", "leak")).await.unwrap();
        server
            .delete("/api/restrooms/B-A3-U1")
            .add_header(header::AUTHORIZATION, admin_auth())
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .delete("/api/restrooms/B-OLD")
            .add_header(header::AUTHORIZATION, admin_auth())
            .await
            .assert_status_ok();
        server
            .delete("/api/restrooms/B-OLD")
            .add_header(header::AUTHORIZATION, admin_auth())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_body() {
        let (server, _) = server().await;

        server
            .put("/api/restrooms/B-A3-U1")
            .add_header(header::AUTHORIZATION, admin_auth())
            .json(&json!({ "displayName": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .put("/api/restrooms/B-A3-U1")
            .add_header(header::AUTHORIZATION, admin_auth())
            .json(&json!({ "zone": "Ala 3" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_catalog_writes_are_rejected() {
        let (server, _) = server().await;

        let response = server
            .put("/api/restrooms/B-A1-H1")
            .json(&json!({ "displayName": "x", "active": false }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.header(header::WWW_AUTHENTICATE),
            "Basic realm=\"Restroom catalog\""
        );

        server
            .delete("/api/restrooms/B-OLD")
            .add_header(
                header::AUTHORIZATION,
                format!("Basic {}", BASE64_STANDARD.encode("ops:wrong")),
            )
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        // Restroom is untouched and still accepts QR lookups
        let body: Value = server.get("/api/restrooms/B-A1-H1").await.json();
        assert_eq!(body["active"], true);
        assert_ne!(body["displayName"], "x");
    }
}
