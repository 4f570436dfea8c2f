mod report;

pub use report::{CreateReport, KpiRow, Report, ReportWithRestroom};
