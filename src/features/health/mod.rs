//! Liveness check that round-trips the report store.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::modules::store::ReportStore;
use crate::shared::types::ErrorResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub ok: bool,
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthDto),
        (status = 500, description = "Store unreachable", body = ErrorResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(store): State<Arc<dyn ReportStore>>) -> Result<Json<HealthDto>> {
    store.ping().await?;
    Ok(Json(HealthDto { ok: true }))
}

pub fn routes(store: Arc<dyn ReportStore>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .with_state(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    use crate::modules::store::MemoryReportStore;

    #[tokio::test]
    async fn test_health_ok() {
        let server = TestServer::new(routes(Arc::new(MemoryReportStore::new()))).unwrap();
        let response = server.get("/api/health").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "ok": true }));
    }
}
