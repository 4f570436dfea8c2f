//! Store handle for the restroom catalog and submitted reports.
//!
//! Services receive an `Arc<dyn ReportStore>` at construction time. The
//! PostgreSQL store is used in production; the in-memory store backs local
//! runs without `DATABASE_URL` and the test suite.

mod memory_store;
mod postgres_store;

pub use memory_store::MemoryReportStore;
pub use postgres_store::PgReportStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Result;
use crate::features::reports::models::{CreateReport, KpiRow, Report, ReportWithRestroom};
use crate::features::restrooms::models::Restroom;
use crate::shared::types::Pagination;

/// Report selection shared by listings and KPIs. All conditions are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
    /// Exact match on the restroom's zone
    pub zone: Option<String>,
    /// Exact match on the report's restroom
    pub restroom_id: Option<String>,
    /// Case-insensitive substring over category, comment, restroom name,
    /// restroom id, zone and floor
    pub search: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report, restroom: &Restroom) -> bool {
        if self.created_from.is_some_and(|from| report.created_at < from) {
            return false;
        }
        if self
            .created_before
            .is_some_and(|before| report.created_at >= before)
        {
            return false;
        }
        if let Some(zone) = &self.zone {
            if restroom.zone.as_deref() != Some(zone.as_str()) {
                return false;
            }
        }
        if let Some(restroom_id) = &self.restroom_id {
            if &report.restroom_id != restroom_id {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(report.category.as_str()),
                report.comment.as_deref(),
                Some(restroom.display_name.as_str()),
                Some(restroom.id.as_str()),
                restroom.zone.as_deref(),
                restroom.floor.as_deref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

/// Persistence port for restrooms and reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Round-trip the backing store
    async fn ping(&self) -> Result<()>;

    async fn get_restroom(&self, id: &str) -> Result<Option<Restroom>>;

    /// Restrooms ordered by zone, floor, display name (missing values last)
    async fn list_restrooms(&self, include_inactive: bool) -> Result<Vec<Restroom>>;

    /// Insert or replace a restroom by id
    async fn upsert_restroom(&self, restroom: &Restroom) -> Result<Restroom>;

    /// Returns `false` when the restroom does not exist. Fails with
    /// `AppError::Conflict` when reports still reference it.
    async fn delete_restroom(&self, id: &str) -> Result<bool>;

    /// Insert a report, assigning `id` and `created_at`
    async fn insert_report(&self, data: &CreateReport) -> Result<Report>;

    async fn count_reports(&self) -> Result<i64>;

    /// Page of matching reports, newest first, plus the unpaginated total
    async fn list_reports(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<ReportWithRestroom>, i64)>;

    /// Every matching report in insertion order (ascending id)
    async fn kpi_rows(&self, filter: &ReportFilter) -> Result<Vec<KpiRow>>;

    /// Release pooled resources on shutdown
    async fn close(&self);
}
