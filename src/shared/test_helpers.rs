#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::core::config::TimeZoneConfig;
#[cfg(test)]
use crate::features::reports::models::CreateReport;
#[cfg(test)]
use crate::features::restrooms::models::Restroom;
#[cfg(test)]
use crate::features::restrooms::RestroomService;
#[cfg(test)]
use crate::modules::store::{MemoryReportStore, ReportStore};
#[cfg(test)]
use crate::shared::timezone::TimeZoneResolver;

#[cfg(test)]
pub const QR_BASE_URL: &str = "http://localhost:8000/qr";

/// Inactive restroom present in [`seeded_store`]
#[cfg(test)]
pub const INACTIVE_RESTROOM_ID: &str = "B-OLD";

/// Memory store holding the default catalog plus one inactive restroom
#[cfg(test)]
pub async fn seeded_store() -> Arc<MemoryReportStore> {
    let store = Arc::new(MemoryReportStore::new());
    for restroom in RestroomService::default_restrooms() {
        store.upsert_restroom(&restroom).await.unwrap();
    }
    store
        .upsert_restroom(&Restroom {
            id: INACTIVE_RESTROOM_ID.to_string(),
            display_name: "Closed restroom".to_string(),
            zone: None,
            floor: None,
            sex_designation: None,
            active: false,
        })
        .await
        .unwrap();
    store
}

/// Resolver whose configured default is `UTC-6`
#[cfg(test)]
pub fn resolver() -> TimeZoneResolver {
    TimeZoneResolver::new(&TimeZoneConfig {
        default_zone: "UTC-6".to_string(),
    })
}

#[cfg(test)]
pub fn new_report(restroom_id: &str, category: &str) -> CreateReport {
    CreateReport {
        restroom_id: restroom_id.to_string(),
        category: category.to_string(),
        comment: None,
        photo_url: None,
        origin: "qr".to_string(),
        created_by_ip: None,
        status: "open".to_string(),
    }
}
