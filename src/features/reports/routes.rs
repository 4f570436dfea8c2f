use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::modules::storage::LocalPhotoStorage;

/// Create routes for the reports feature
///
/// `/api/reportes` and `/api/reportes_list` serve forms and dashboards
/// built against the legacy paths.
pub fn routes(
    report_service: Arc<ReportService>,
    photo_storage: Arc<LocalPhotoStorage>,
) -> Router {
    let state = ReportState {
        report_service,
        photo_storage,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::submit_report),
        )
        .route("/api/reportes", post(handlers::submit_report))
        .route("/api/reportes_list", get(handlers::list_reports))
        .with_state(state)
}
