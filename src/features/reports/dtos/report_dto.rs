use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::ReportWithRestroom;
use crate::modules::store::ReportFilter;
use crate::shared::timezone::ZoneHandle;

// =============================================================================
// SUBMISSION
// =============================================================================

/// Multipart form accepted by `POST /api/reports`
/// Note: This struct is for Swagger UI documentation only.
/// The handler reads the form with axum's Multipart extractor.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitReportForm {
    /// Restroom code from the QR label (legacy name: `id_bano`)
    #[schema(example = "B-A1-H1")]
    pub restroom_id: String,
    /// Free-form category (legacy name: `categoria`)
    #[schema(example = "no paper")]
    pub category: String,
    /// Optional comment (legacy name: `comentario`)
    pub comment: Option<String>,
    /// Optional png/jpg/jpeg/webp photo (legacy name: `foto`)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

/// Validated text part of a submission
#[derive(Debug, Clone, Validate)]
pub struct SubmitReport {
    #[validate(length(min = 1, message = "missing required fields"))]
    pub restroom_id: String,
    #[validate(length(min = 1, message = "missing required fields"))]
    pub category: String,
    pub comment: Option<String>,
}

impl SubmitReport {
    /// Trims every field; a blank comment becomes `None`
    pub fn new(restroom_id: &str, category: &str, comment: Option<&str>) -> Self {
        Self {
            restroom_id: restroom_id.trim().to_string(),
            category: category.trim().to_string(),
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        }
    }
}

/// Response DTO for an accepted report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponseDto {
    /// Always `true`
    pub ok: bool,
    pub report_id: i64,
}

// =============================================================================
// FILTERS
// =============================================================================

/// Raw filter fields shared by the listing and KPI endpoints
#[derive(Debug, Clone, Default)]
pub struct ReportFilterParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub zone: Option<String>,
    pub restroom_id: Option<String>,
    pub search_text: Option<String>,
}

impl ReportFilterParams {
    /// Resolve the inclusive local-day range into a half-open UTC range in `zone`.
    /// Empty strings count as absent.
    pub fn into_filter(self, zone: &ZoneHandle) -> Result<ReportFilter> {
        let date_from = parse_date_param("dateFrom", self.date_from.as_deref())?;
        let date_to = parse_date_param("dateTo", self.date_to.as_deref())?;

        Ok(ReportFilter {
            created_from: date_from.map(|d| zone.start_of_day(d)),
            created_before: date_to
                .and_then(|d| d.succ_opt())
                .map(|d| zone.start_of_day(d)),
            zone: non_empty(self.zone),
            restroom_id: non_empty(self.restroom_id),
            search: non_empty(self.search_text),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a `YYYY-MM-DD` query value; blank means absent
pub fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::Validation(format!("{} must be a date in YYYY-MM-DD format", name))
            }),
    }
}

/// Query params for the report listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    /// First local day included (YYYY-MM-DD)
    #[serde(alias = "desde")]
    pub date_from: Option<String>,
    /// Last local day included (YYYY-MM-DD)
    #[serde(alias = "hasta")]
    pub date_to: Option<String>,
    #[serde(alias = "zona")]
    pub zone: Option<String>,
    #[serde(alias = "id_bano")]
    pub restroom_id: Option<String>,
    /// Case-insensitive text search
    #[serde(alias = "q")]
    pub search_text: Option<String>,
    /// Page number, default 1
    pub page: Option<i64>,
    /// Page size, default 10, clamped to 5..=50
    #[serde(alias = "per_page")]
    pub page_size: Option<i64>,
    /// Time zone for day boundaries and local timestamps
    pub tz: Option<String>,
}

impl ListReportsQuery {
    pub fn filter_params(&self) -> ReportFilterParams {
        ReportFilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            zone: self.zone.clone(),
            restroom_id: self.restroom_id.clone(),
            search_text: self.search_text.clone(),
        }
    }
}

// =============================================================================
// LISTING
// =============================================================================

/// One report in a listing, joined with its restroom
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemDto {
    pub id: i64,
    pub restroom_id: String,
    pub restroom_name: String,
    pub zone: Option<String>,
    pub floor: Option<String>,
    pub sex_designation: Option<String>,
    pub category: String,
    pub comment: Option<String>,
    pub photo_url: Option<String>,
    pub origin: String,
    pub status: String,
    /// RFC 3339 instant in UTC
    #[schema(example = "2025-01-01T23:30:00Z")]
    pub created_at_utc: String,
    /// Same instant with the resolved zone's offset
    #[schema(example = "2025-01-01T17:30:00-06:00")]
    pub created_at_local: String,
}

impl ReportItemDto {
    pub fn from_row(row: ReportWithRestroom, zone: &ZoneHandle) -> Self {
        let report = row.report;
        Self {
            id: report.id,
            restroom_id: report.restroom_id,
            restroom_name: row.restroom_name,
            zone: row.zone,
            floor: row.floor,
            sex_designation: row.sex_designation,
            category: report.category,
            comment: report.comment,
            photo_url: report.photo_url,
            origin: report.origin,
            status: report.status,
            created_at_utc: report.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            created_at_local: zone
                .to_local(report.created_at)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Page of reports
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportPageDto {
    pub page: i64,
    pub page_size: i64,
    /// Matching reports before pagination
    pub total: i64,
    pub total_pages: i64,
    /// Zone used for local timestamps and day boundaries
    pub timezone: String,
    pub items: Vec<ReportItemDto>,
}
