use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for report
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Report {
    pub id: i64,
    pub restroom_id: String,
    /// Free-form category tag; not constrained to a fixed list
    pub category: String,
    pub comment: Option<String>,
    pub photo_url: Option<String>,
    pub origin: String,
    pub created_at: DateTime<Utc>,
    pub created_by_ip: Option<String>,
    /// Stored for forward compatibility, never read by filters or KPIs
    pub status: String,
}

/// Data for creating a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub restroom_id: String,
    pub category: String,
    pub comment: Option<String>,
    pub photo_url: Option<String>,
    pub origin: String,
    pub created_by_ip: Option<String>,
    pub status: String,
}

/// Report joined with the restroom metadata shown in listings
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithRestroom {
    #[sqlx(flatten)]
    pub report: Report,
    pub restroom_name: String,
    pub zone: Option<String>,
    pub floor: Option<String>,
    pub sex_designation: Option<String>,
}

/// Minimal projection used for KPI aggregation
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct KpiRow {
    pub id: i64,
    pub category: String,
    pub restroom_id: String,
    pub zone: Option<String>,
    pub created_at: DateTime<Utc>,
}
