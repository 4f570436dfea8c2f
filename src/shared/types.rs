use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Normalized page window for list endpoints.
///
/// `page` is clamped to at least 1 and `page_size` to `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
/// whatever the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Number of pages for `total` items; never less than 1
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 1;
        }
        (total + self.page_size - 1) / self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::new(None, None);
        assert_eq!(p, Pagination::default());
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(Pagination::new(None, Some(1000)).page_size, 50);
        assert_eq!(Pagination::new(None, Some(0)).page_size, 5);
        assert_eq!(Pagination::new(None, Some(-3)).page_size, 5);
        assert_eq!(Pagination::new(None, Some(7)).page_size, 7);
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        assert_eq!(Pagination::new(Some(0), None).page, 1);
        assert_eq!(Pagination::new(Some(-4), None).page, 1);
        assert_eq!(Pagination::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(Some(1), Some(10));
        assert_eq!(p.total_pages(0), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
        assert_eq!(p.total_pages(23), 3);
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("missing required fields")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "ok": false, "error": "missing required fields" })
        );
    }
}
