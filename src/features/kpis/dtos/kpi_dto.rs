use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::reports::dtos::ReportFilterParams;
use crate::features::restrooms::models::Restroom;

/// Query params for KPIs. Same filters as the listing, without search or paging.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct KpiQuery {
    /// First local day included (YYYY-MM-DD)
    #[serde(alias = "desde")]
    pub date_from: Option<String>,
    /// Last local day included (YYYY-MM-DD)
    #[serde(alias = "hasta")]
    pub date_to: Option<String>,
    #[serde(alias = "zona")]
    pub zone: Option<String>,
    #[serde(alias = "id_bano")]
    pub restroom_id: Option<String>,
    /// Time zone for day buckets
    pub tz: Option<String>,
}

impl KpiQuery {
    pub fn filter_params(&self) -> ReportFilterParams {
        ReportFilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            zone: self.zone.clone(),
            restroom_id: self.restroom_id.clone(),
            search_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopRestroomDto {
    pub restroom_id: String,
    /// Catalog name, or the raw id when the restroom is no longer active
    pub display_name: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryDto {
    pub id: String,
    pub display_name: String,
    pub zone: Option<String>,
    pub floor: Option<String>,
    pub sex_designation: Option<String>,
}

impl From<Restroom> for CatalogEntryDto {
    fn from(r: Restroom) -> Self {
        Self {
            id: r.id,
            display_name: r.display_name,
            zone: r.zone,
            floor: r.floor,
            sex_designation: r.sex_designation,
        }
    }
}

/// KPI envelope. Maps serialize with sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiDto {
    pub total_reports: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_restroom: BTreeMap<String, i64>,
    /// Restrooms without a zone count under `"unassigned"`
    pub by_zone: BTreeMap<String, i64>,
    /// Keyed by ISO date in the resolved zone
    pub by_local_day: BTreeMap<String, i64>,
    pub top_restrooms: Vec<TopRestroomDto>,
    /// Every active restroom, whether or not it has reports
    pub restroom_catalog: BTreeMap<String, CatalogEntryDto>,
    pub timezone: String,
}
