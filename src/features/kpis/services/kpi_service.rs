use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::kpis::dtos::{CatalogEntryDto, KpiDto, KpiQuery, TopRestroomDto};
use crate::features::reports::models::KpiRow;
use crate::features::restrooms::models::Restroom;
use crate::modules::store::ReportStore;
use crate::shared::constants::{TOP_RESTROOMS_LIMIT, UNASSIGNED_ZONE_KEY};
use crate::shared::timezone::{TimeZoneResolver, ZoneHandle};

/// Service for on-the-fly KPI aggregation
pub struct KpiService {
    store: Arc<dyn ReportStore>,
    resolver: TimeZoneResolver,
}

impl KpiService {
    pub fn new(store: Arc<dyn ReportStore>, resolver: TimeZoneResolver) -> Self {
        Self { store, resolver }
    }

    /// Grouped counts over the filtered reports. Read-only.
    pub async fn compute(&self, query: KpiQuery) -> Result<KpiDto> {
        let zone = self.resolver.resolve(query.tz.as_deref());
        let filter = query.filter_params().into_filter(&zone)?;

        let rows = self.store.kpi_rows(&filter).await?;
        let catalog = self.store.list_restrooms(false).await?;

        tracing::debug!(
            "Aggregating {} reports over {} active restrooms in {}",
            rows.len(),
            catalog.len(),
            zone.name()
        );

        Ok(aggregate(&rows, catalog, &zone))
    }
}

fn bump(map: &mut BTreeMap<String, i64>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Aggregate `rows` (ascending id) into the KPI envelope
pub fn aggregate(rows: &[KpiRow], catalog: Vec<Restroom>, zone: &ZoneHandle) -> KpiDto {
    let mut by_category: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_restroom: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_zone: BTreeMap<String, i64> = BTreeMap::new();
    let mut by_local_day: BTreeMap<String, i64> = BTreeMap::new();

    // Restrooms in order of their first matching report, for tie breaks
    let mut first_seen: Vec<&str> = Vec::new();

    for row in rows {
        bump(&mut by_category, &row.category);
        bump(&mut by_zone, row.zone.as_deref().unwrap_or(UNASSIGNED_ZONE_KEY));
        bump(
            &mut by_local_day,
            &zone.local_date(row.created_at).format("%Y-%m-%d").to_string(),
        );

        if !by_restroom.contains_key(&row.restroom_id) {
            first_seen.push(&row.restroom_id);
        }
        bump(&mut by_restroom, &row.restroom_id);
    }

    let restroom_catalog: BTreeMap<String, CatalogEntryDto> = catalog
        .into_iter()
        .map(|r| (r.id.clone(), CatalogEntryDto::from(r)))
        .collect();

    let names: HashMap<&str, &str> = restroom_catalog
        .values()
        .map(|entry| (entry.id.as_str(), entry.display_name.as_str()))
        .collect();

    let mut top_restrooms: Vec<TopRestroomDto> = first_seen
        .into_iter()
        .map(|id| TopRestroomDto {
            restroom_id: id.to_string(),
            display_name: names.get(id).copied().unwrap_or(id).to_string(),
            total: by_restroom.get(id).copied().unwrap_or(0),
        })
        .collect();
    // Stable: equal counts keep first-seen order
    top_restrooms.sort_by(|a, b| b.total.cmp(&a.total));
    top_restrooms.truncate(TOP_RESTROOMS_LIMIT);

    KpiDto {
        total_reports: rows.len() as i64,
        by_category,
        by_restroom,
        by_zone,
        by_local_day,
        top_restrooms,
        restroom_catalog,
        timezone: zone.name(),
    }
}
