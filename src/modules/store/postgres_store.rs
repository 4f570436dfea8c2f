use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReportFilter, ReportStore};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, KpiRow, Report, ReportWithRestroom};
use crate::features::restrooms::models::Restroom;
use crate::shared::types::Pagination;

/// Shared WHERE clause for listings and KPIs. Binds $1..$5 in the order of
/// [`PgReportStore::bind_filter`].
const REPORT_FILTER_SQL: &str = r#"
    ($1::timestamptz IS NULL OR r.created_at >= $1)
    AND ($2::timestamptz IS NULL OR r.created_at < $2)
    AND ($3::text IS NULL OR b.zone = $3)
    AND ($4::text IS NULL OR r.restroom_id = $4)
    AND (
        $5::text IS NULL
        OR r.category ILIKE $5 ESCAPE '\'
        OR r.comment ILIKE $5 ESCAPE '\'
        OR b.display_name ILIKE $5 ESCAPE '\'
        OR b.id ILIKE $5 ESCAPE '\'
        OR b.zone ILIKE $5 ESCAPE '\'
        OR b.floor ILIKE $5 ESCAPE '\'
    )
"#;

/// PostgreSQL backed store
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn bind_filter<'q, O>(
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        filter: &'q ReportFilter,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        query
            .bind(filter.created_from)
            .bind(filter.created_before)
            .bind(filter.zone.as_deref())
            .bind(filter.restroom_id.as_deref())
            .bind(filter.search.as_deref().map(like_pattern))
    }
}

/// `%needle%` with LIKE wildcards escaped
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(())
    }

    async fn get_restroom(&self, id: &str) -> Result<Option<Restroom>> {
        sqlx::query_as::<_, Restroom>(
            r#"
            SELECT id, display_name, zone, floor, sex_designation, active
            FROM restrooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get restroom: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_restrooms(&self, include_inactive: bool) -> Result<Vec<Restroom>> {
        sqlx::query_as::<_, Restroom>(
            r#"
            SELECT id, display_name, zone, floor, sex_designation, active
            FROM restrooms
            WHERE ($1 OR active = TRUE)
            ORDER BY zone NULLS LAST, floor NULLS LAST, display_name, id
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list restrooms: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn upsert_restroom(&self, restroom: &Restroom) -> Result<Restroom> {
        sqlx::query_as::<_, Restroom>(
            r#"
            INSERT INTO restrooms (id, display_name, zone, floor, sex_designation, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                zone = EXCLUDED.zone,
                floor = EXCLUDED.floor,
                sex_designation = EXCLUDED.sex_designation,
                active = EXCLUDED.active
            RETURNING id, display_name, zone, floor, sex_designation, active
            "#,
        )
        .bind(&restroom.id)
        .bind(&restroom.display_name)
        .bind(&restroom.zone)
        .bind(&restroom.floor)
        .bind(&restroom.sex_designation)
        .bind(restroom.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert restroom: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn delete_restroom(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM restrooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(format!("Restroom '{}' still has reports", id))
                }
                e => {
                    tracing::error!("Failed to delete restroom: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_report(&self, data: &CreateReport) -> Result<Report> {
        sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (restroom_id, category, comment, photo_url, origin, created_by_ip, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, restroom_id, category, comment, photo_url, origin, created_at, created_by_ip, status
            "#,
        )
        .bind(&data.restroom_id)
        .bind(&data.category)
        .bind(&data.comment)
        .bind(&data.photo_url)
        .bind(&data.origin)
        .bind(&data.created_by_ip)
        .bind(&data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::InvalidReference("restroom invalid or inactive".to_string())
            }
            e => {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            }
        })
    }

    async fn count_reports(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(count)
    }

    async fn list_reports(
        &self,
        filter: &ReportFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<ReportWithRestroom>, i64)> {
        let count_sql = format!(
            r#"
            SELECT COUNT(*)
            FROM reports r
            JOIN restrooms b ON b.id = r.restroom_id
            WHERE {}
            "#,
            REPORT_FILTER_SQL
        );
        let (total,): (i64,) = Self::bind_filter(sqlx::query_as(&count_sql), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reports: {:?}", e);
                AppError::Database(e)
            })?;

        let list_sql = format!(
            r#"
            SELECT
                r.id, r.restroom_id, r.category, r.comment, r.photo_url, r.origin,
                r.created_at, r.created_by_ip, r.status,
                b.display_name AS restroom_name, b.zone, b.floor, b.sex_designation
            FROM reports r
            JOIN restrooms b ON b.id = r.restroom_id
            WHERE {}
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT $6 OFFSET $7
            "#,
            REPORT_FILTER_SQL
        );
        let items = Self::bind_filter(sqlx::query_as::<_, ReportWithRestroom>(&list_sql), filter)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn kpi_rows(&self, filter: &ReportFilter) -> Result<Vec<KpiRow>> {
        let sql = format!(
            r#"
            SELECT r.id, r.category, r.restroom_id, b.zone, r.created_at
            FROM reports r
            JOIN restrooms b ON b.id = r.restroom_id
            WHERE {}
            ORDER BY r.id
            "#,
            REPORT_FILTER_SQL
        );
        Self::bind_filter(sqlx::query_as::<_, KpiRow>(&sql), filter)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load KPI rows: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
