use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{ReportFilter, ReportStore};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, KpiRow, Report, ReportWithRestroom};
use crate::features::restrooms::models::Restroom;
use crate::shared::types::Pagination;

#[derive(Debug, Default)]
struct State {
    restrooms: BTreeMap<String, Restroom>,
    reports: Vec<Report>,
    next_id: i64,
}

/// Process-local store. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    state: RwLock<State>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }

    /// Reports matching `filter` joined with their restroom, in insertion order
    fn matching<'a>(state: &'a State, filter: &ReportFilter) -> Vec<(&'a Report, &'a Restroom)> {
        state
            .reports
            .iter()
            .filter_map(|report| {
                let restroom = state.restrooms.get(&report.restroom_id)?;
                filter
                    .matches(report, restroom)
                    .then_some((report, restroom))
            })
            .collect()
    }

    /// Test hook: insert a report with a fixed creation time
    #[cfg(test)]
    pub fn insert_report_at(
        &self,
        data: &CreateReport,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<Report> {
        let mut state = self.write()?;
        state.next_id += 1;
        let report = Report {
            id: state.next_id,
            restroom_id: data.restroom_id.clone(),
            category: data.category.clone(),
            comment: data.comment.clone(),
            photo_url: data.photo_url.clone(),
            origin: data.origin.clone(),
            created_at,
            created_by_ip: data.created_by_ip.clone(),
            status: data.status.clone(),
        };
        state.reports.push(report.clone());
        Ok(report)
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }

    async fn get_restroom(&self, id: &str) -> Result<Option<Restroom>> {
        Ok(self.read()?.restrooms.get(id).cloned())
    }

    async fn list_restrooms(&self, include_inactive: bool) -> Result<Vec<Restroom>> {
        let mut restrooms: Vec<Restroom> = self
            .read()?
            .restrooms
            .values()
            .filter(|r| include_inactive || r.active)
            .cloned()
            .collect();
        restrooms.sort_by(Restroom::catalog_order);
        Ok(restrooms)
    }

    async fn upsert_restroom(&self, restroom: &Restroom) -> Result<Restroom> {
        self.write()?
            .restrooms
            .insert(restroom.id.clone(), restroom.clone());
        Ok(restroom.clone())
    }

    async fn delete_restroom(&self, id: &str) -> Result<bool> {
        let mut state = self.write()?;
        if state.reports.iter().any(|r| r.restroom_id == id) {
            return Err(AppError::Conflict(format!(
                "Restroom '{}' still has reports",
                id
            )));
        }
        Ok(state.restrooms.remove(id).is_some())
    }

    async fn insert_report(&self, data: &CreateReport) -> Result<Report> {
        let mut state = self.write()?;
        if !state.restrooms.contains_key(&data.restroom_id) {
            return Err(AppError::InvalidReference(
                "restroom invalid or inactive".to_string(),
            ));
        }

        // Keep creation times non-decreasing in insertion order
        let now = Utc::now();
        let created_at = state
            .reports
            .last()
            .map_or(now, |last| last.created_at.max(now));

        state.next_id += 1;
        let report = Report {
            id: state.next_id,
            restroom_id: data.restroom_id.clone(),
            category: data.category.clone(),
            comment: data.comment.clone(),
            photo_url: data.photo_url.clone(),
            origin: data.origin.clone(),
            created_at,
            created_by_ip: data.created_by_ip.clone(),
            status: data.status.clone(),
        };
        state.reports.push(report.clone());
        Ok(report)
    }

    async fn count_reports(&self) -> Result<i64> {
        Ok(self.read()?.reports.len() as i64)
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<ReportWithRestroom>, i64)> {
        let state = self.read()?;
        let mut rows = Self::matching(&state, filter);
        rows.sort_by(|(a, _), (b, _)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(0))
            .map(|(report, restroom)| ReportWithRestroom {
                report: report.clone(),
                restroom_name: restroom.display_name.clone(),
                zone: restroom.zone.clone(),
                floor: restroom.floor.clone(),
                sex_designation: restroom.sex_designation.clone(),
            })
            .collect();

        Ok((items, total))
    }

    async fn kpi_rows(&self, filter: &ReportFilter) -> Result<Vec<KpiRow>> {
        let state = self.read()?;
        Ok(Self::matching(&state, filter)
            .into_iter()
            .map(|(report, restroom)| KpiRow {
                id: report.id,
                category: report.category.clone(),
                restroom_id: report.restroom_id.clone(),
                zone: restroom.zone.clone(),
                created_at: report.created_at,
            })
            .collect())
    }

    async fn close(&self) {}
}
