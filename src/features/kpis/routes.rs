use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::kpis::handlers;
use crate::features::kpis::services::KpiService;

/// Create routes for the KPI feature
pub fn routes(service: Arc<KpiService>) -> Router {
    Router::new()
        .route("/api/kpis", get(handlers::get_kpis))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::modules::store::ReportStore;
    use crate::shared::test_helpers::{new_report, resolver, seeded_store};

    #[tokio::test]
    async fn test_kpis_envelope_with_legacy_params() {
        let store = seeded_store().await;
        store.insert_report(&new_report("B-A1-H1", "paper")).await.unwrap();
        store.insert_report(&new_report("B-A2-H2", "leak")).await.unwrap();
        let server =
            TestServer::new(routes(Arc::new(KpiService::new(store, resolver())))).unwrap();

        let body: Value = server
            .get("/api/kpis")
            .add_query_param("zona", "Ala 1")
            .add_query_param("tz", "America/Mexico_City")
            .await
            .json();

        assert_eq!(body["totalReports"], 1);
        assert_eq!(body["byCategory"]["paper"], 1);
        assert_eq!(body["byZone"]["Ala 1"], 1);
        assert_eq!(body["timezone"], "America/Mexico_City");
        assert_eq!(body["topRestrooms"][0]["restroomId"], "B-A1-H1");
        assert_eq!(
            body["restroomCatalog"]["B-A2-H2"]["displayName"],
            "Baño Hombres Ala 2 - Piso 2"
        );
    }

    #[tokio::test]
    async fn test_invalid_tz_falls_back_to_default() {
        let store = seeded_store().await;
        let server =
            TestServer::new(routes(Arc::new(KpiService::new(store, resolver())))).unwrap();

        let body: Value = server
            .get("/api/kpis")
            .add_query_param("tz", "not-a-real-zone")
            .await
            .json();
        assert_eq!(body["timezone"], "-06:00");
        assert_eq!(body["totalReports"], 0);
    }
}
