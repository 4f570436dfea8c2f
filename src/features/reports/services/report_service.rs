use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{ListReportsQuery, ReportItemDto, ReportPageDto, SubmitReport};
use crate::features::reports::models::CreateReport;
use crate::modules::store::ReportStore;
use crate::shared::constants::{DEFAULT_REPORT_ORIGIN, DEFAULT_REPORT_STATUS};
use crate::shared::timezone::TimeZoneResolver;
use crate::shared::types::Pagination;

/// Service for report ingestion and listing
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    resolver: TimeZoneResolver,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, resolver: TimeZoneResolver) -> Self {
        Self { store, resolver }
    }

    /// Validate a submission without writing anything
    ///
    /// Fails with `Validation` for blank required fields and
    /// `InvalidReference` when the restroom is missing or inactive.
    pub async fn check_submission(&self, submit: &SubmitReport) -> Result<()> {
        submit
            .validate()
            .map_err(|_| AppError::Validation("missing required fields".to_string()))?;

        let restroom = self.store.get_restroom(&submit.restroom_id).await?;
        match restroom {
            Some(r) if r.active => Ok(()),
            _ => Err(AppError::InvalidReference(
                "restroom invalid or inactive".to_string(),
            )),
        }
    }

    /// Persist a new report and return its id
    pub async fn submit(
        &self,
        submit: SubmitReport,
        photo_url: Option<String>,
        client_ip: Option<String>,
    ) -> Result<i64> {
        self.check_submission(&submit).await?;

        let report = self
            .store
            .insert_report(&CreateReport {
                restroom_id: submit.restroom_id,
                category: submit.category,
                comment: submit.comment,
                photo_url,
                origin: DEFAULT_REPORT_ORIGIN.to_string(),
                created_by_ip: client_ip,
                status: DEFAULT_REPORT_STATUS.to_string(),
            })
            .await?;

        tracing::info!(
            "Created report: {} for restroom: {}",
            report.id,
            report.restroom_id
        );

        Ok(report.id)
    }

    /// Filtered, searched and paginated listing, newest first
    pub async fn list(&self, query: ListReportsQuery) -> Result<ReportPageDto> {
        let zone = self.resolver.resolve(query.tz.as_deref());
        let filter = query.filter_params().into_filter(&zone)?;
        let pagination = Pagination::new(query.page, query.page_size);

        let (rows, total) = self.store.list_reports(&filter, &pagination).await?;

        Ok(ReportPageDto {
            page: pagination.page,
            page_size: pagination.page_size,
            total,
            total_pages: pagination.total_pages(total),
            timezone: zone.name(),
            items: rows
                .into_iter()
                .map(|row| ReportItemDto::from_row(row, &zone))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::restrooms::models::Restroom;
    use crate::modules::store::MemoryReportStore;
    use crate::shared::test_helpers::{new_report, resolver, seeded_store, INACTIVE_RESTROOM_ID};
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    async fn service() -> (ReportService, Arc<MemoryReportStore>) {
        let store = seeded_store().await;
        (ReportService::new(store.clone(), resolver()), store)
    }

    fn by_restroom(restroom_id: &str) -> ListReportsQuery {
        ListReportsQuery {
            restroom_id: Some(restroom_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submit_then_list_by_restroom() {
        let (service, _) = service().await;
        let id = service
            .submit(
                SubmitReport::new("B-A1-M1", "no soap", Some("dispenser empty")),
                None,
                Some("203.0.113.7".to_string()),
            )
            .await
            .unwrap();

        let page = service.list(by_restroom("B-A1-M1")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.id, id);
        assert_eq!(item.category, "no soap");
        assert_eq!(item.comment.as_deref(), Some("dispenser empty"));
        assert_eq!(item.restroom_name, "Baño Mujeres Ala 1 - Piso 1");
        assert_eq!(item.origin, "qr");
        assert_eq!(item.status, "open");
    }

    #[tokio::test]
    async fn test_submit_rejects_inactive_and_unknown_restrooms() {
        let (service, store) = service().await;

        for restroom_id in [INACTIVE_RESTROOM_ID, "NOPE"] {
            let err = service
                .submit(SubmitReport::new(restroom_id, "leak", None), None, None)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidReference(_)));
        }
        assert_eq!(store.count_reports().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_category() {
        let (service, store) = service().await;
        let err = service
            .submit(SubmitReport::new("B-A1-H1", "   ", None), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "missing required fields"));
        assert_eq!(store.count_reports().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pagination_past_the_end_is_empty() {
        let (service, store) = service().await;
        for i in 0..23 {
            store
                .insert_report(&new_report("B-A1-H1", &format!("c{}", i)))
                .await
                .unwrap();
        }

        let page = |n| ListReportsQuery {
            page: Some(n),
            page_size: Some(10),
            ..Default::default()
        };

        let third = service.list(page(3)).await.unwrap();
        assert_eq!(third.total, 23);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.items.len(), 3);

        let fourth = service.list(page(4)).await.unwrap();
        assert_eq!(fourth.page, 4);
        assert!(fourth.items.is_empty());
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let (service, _) = service().await;
        let page = service
            .list(ListReportsQuery {
                page_size: Some(1000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.page_size, 50);

        let page = service
            .list(ListReportsQuery {
                page: Some(0),
                page_size: Some(-1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 5);
    }

    #[tokio::test]
    async fn test_empty_result_has_one_page() {
        let (service, _) = service().await;
        let page = service.list(by_restroom("B-A2-H2")).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_local_day_filter_and_timestamps() {
        let (service, store) = service().await;
        store
            .insert_report_at(&new_report("B-A1-H1", "leak"), utc("2025-01-01T03:30:00Z"))
            .unwrap();

        let query = |day: &str, tz: &str| ListReportsQuery {
            date_from: Some(day.to_string()),
            date_to: Some(day.to_string()),
            tz: Some(tz.to_string()),
            ..Default::default()
        };

        let page = service.list(query("2024-12-31", "UTC-6")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.timezone, "-06:00");
        assert_eq!(page.items[0].created_at_utc, "2025-01-01T03:30:00Z");
        assert_eq!(page.items[0].created_at_local, "2024-12-31T21:30:00-06:00");

        let page = service.list(query("2025-01-01", "UTC-6")).await.unwrap();
        assert_eq!(page.total, 0);

        // The UTC calendar day only applies when UTC is requested
        let page = service.list(query("2025-01-01", "UTC")).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_search_and_zone_filters() {
        let (service, store) = service().await;
        store.insert_report(&new_report("B-A1-H1", "Paper")).await.unwrap();
        store.insert_report(&new_report("B-A2-H2", "soap")).await.unwrap();

        let page = service
            .list(ListReportsQuery {
                search_text: Some("PAPER".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = service
            .list(ListReportsQuery {
                zone: Some("Ala 2".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].restroom_id, "B-A2-H2");

        // Restroom name is searchable
        let page = service
            .list(ListReportsQuery {
                search_text: Some("ala 2 - piso".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_search_matches_restroom_floor() {
        let (service, store) = service().await;
        store
            .upsert_restroom(&Restroom {
                id: "B-SVC".to_string(),
                display_name: "Baño Personal".to_string(),
                zone: Some("Servicio".to_string()),
                floor: Some("Mezzanine".to_string()),
                sex_designation: None,
                active: true,
            })
            .await
            .unwrap();
        store.insert_report(&new_report("B-SVC", "leak")).await.unwrap();
        store.insert_report(&new_report("B-A1-H1", "leak")).await.unwrap();

        let page = service
            .list(ListReportsQuery {
                search_text: Some("MEZZ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].restroom_id, "B-SVC");
    }

    #[tokio::test]
    async fn test_malformed_date_is_validation_error() {
        let (service, _) = service().await;
        let err = service
            .list(ListReportsQuery {
                date_from: Some("yesterday".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
