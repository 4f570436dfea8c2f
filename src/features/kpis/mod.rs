//! Dashboard KPIs computed on demand from the report store.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/kpis` | Grouped counts for the filtered report set |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::KpiService;
