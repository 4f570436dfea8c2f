/// Default page size for report listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Smallest page size a listing will honour
pub const MIN_PAGE_SIZE: i64 = 5;

/// Largest page size a listing will honour
pub const MAX_PAGE_SIZE: i64 = 50;

// =============================================================================
// REPORT DEFAULTS
// =============================================================================

/// Submission channel recorded for reports coming from the QR form
pub const DEFAULT_REPORT_ORIGIN: &str = "qr";

/// Status tag given to new reports (stored, never aggregated)
pub const DEFAULT_REPORT_STATUS: &str = "open";

// =============================================================================
// KPI CONSTANTS
// =============================================================================

/// Number of entries kept in the top restrooms ranking
pub const TOP_RESTROOMS_LIMIT: usize = 10;

/// Zone key used for reports whose restroom has no zone
pub const UNASSIGNED_ZONE_KEY: &str = "unassigned";
