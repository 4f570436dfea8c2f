use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::kpis::dtos::{KpiDto, KpiQuery};
use crate::features::kpis::services::KpiService;
use crate::shared::types::ErrorResponse;

/// Report KPIs
///
/// Counts by category, restroom, zone and local day over the filtered reports.
#[utoipa::path(
    get,
    path = "/api/kpis",
    params(KpiQuery),
    responses(
        (status = 200, description = "KPI envelope", body = KpiDto),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "kpis"
)]
pub async fn get_kpis(
    State(service): State<Arc<KpiService>>,
    AppQuery(query): AppQuery<KpiQuery>,
) -> Result<Json<KpiDto>> {
    let kpis = service.compute(query).await?;
    Ok(Json(kpis))
}
