pub mod health;
pub mod kpis;
pub mod reports;
pub mod restrooms;
