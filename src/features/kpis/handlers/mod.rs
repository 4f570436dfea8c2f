pub mod kpi_handler;

pub use kpi_handler::{__path_get_kpis, get_kpis};
