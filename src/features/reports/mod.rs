//! Maintenance reports: QR form ingestion and the staff listing.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Submit a report (alias `/api/reportes`) |
//! | GET | `/api/reports` | Filtered, paginated listing (alias `/api/reportes_list`) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
