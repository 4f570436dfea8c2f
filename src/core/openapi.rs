use utoipa::{Modify, OpenApi};

use crate::features::health;
use crate::features::kpis::{dtos as kpis_dtos, handlers as kpis_handlers};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::restrooms::{dtos as restrooms_dtos, handlers as restrooms_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::submit_report,
        reports_handlers::list_reports,
        // KPIs
        kpis_handlers::get_kpis,
        // Restrooms
        restrooms_handlers::list_restrooms,
        restrooms_handlers::get_restroom,
        restrooms_handlers::upsert_restroom,
        restrooms_handlers::delete_restroom,
        // Health
        health::health_check,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Reports
            reports_dtos::SubmitReportForm,
            reports_dtos::SubmitReportResponseDto,
            reports_dtos::ReportItemDto,
            reports_dtos::ReportPageDto,
            // KPIs
            kpis_dtos::KpiDto,
            kpis_dtos::TopRestroomDto,
            kpis_dtos::CatalogEntryDto,
            // Restrooms
            restrooms_dtos::RestroomDto,
            restrooms_dtos::UpsertRestroomDto,
            restrooms_dtos::RestroomDeletedDto,
            // Health
            health::HealthDto,
        )
    ),
    tags(
        (name = "reports", description = "Report submission and listing"),
        (name = "kpis", description = "Aggregated report counts"),
        (name = "restrooms", description = "Restroom catalog"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Restroom Reports API",
        version = "0.1.0",
        description = "API documentation for the restroom maintenance report service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
