use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::restrooms::models::Restroom;

/// Response DTO for a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestroomDto {
    #[schema(example = "B-A1-H1")]
    pub id: String,
    pub display_name: String,
    pub zone: Option<String>,
    pub floor: Option<String>,
    pub sex_designation: Option<String>,
    pub active: bool,
    /// URL encoded into this restroom's QR label
    pub qr_url: String,
}

impl RestroomDto {
    pub fn from_restroom(restroom: Restroom, qr_base_url: &str) -> Self {
        let qr_url = format!("{}?r={}", qr_base_url, urlencoding::encode(&restroom.id));
        Self {
            id: restroom.id,
            display_name: restroom.display_name,
            zone: restroom.zone,
            floor: restroom.floor,
            sex_designation: restroom.sex_designation,
            active: restroom.active,
            qr_url,
        }
    }
}

/// Request DTO for creating or replacing a restroom
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRestroomDto {
    #[validate(length(min = 1, max = 200, message = "displayName must be 1-200 characters"))]
    pub display_name: String,

    #[validate(length(max = 100, message = "zone must not exceed 100 characters"))]
    pub zone: Option<String>,

    #[validate(length(max = 50, message = "floor must not exceed 50 characters"))]
    pub floor: Option<String>,

    #[validate(length(max = 50, message = "sexDesignation must not exceed 50 characters"))]
    pub sex_designation: Option<String>,

    /// Defaults to `true`
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl UpsertRestroomDto {
    /// Build the stored record, trimming text and dropping blank optionals
    pub fn into_restroom(self, id: &str) -> Restroom {
        Restroom {
            id: id.to_string(),
            display_name: self.display_name.trim().to_string(),
            zone: non_blank(self.zone),
            floor: non_blank(self.floor),
            sex_designation: non_blank(self.sex_designation),
            active: self.active,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query params for the catalog listing
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRestroomsQuery {
    /// Include deactivated restrooms. Default: false
    #[serde(default, alias = "include_inactive")]
    pub include_inactive: bool,
}

/// Response DTO for a deleted restroom
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestroomDeletedDto {
    pub ok: bool,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_url_encodes_id() {
        let restroom = Restroom {
            id: "Lobby 1".to_string(),
            display_name: "Lobby".to_string(),
            zone: None,
            floor: None,
            sex_designation: None,
            active: true,
        };
        let dto = RestroomDto::from_restroom(restroom, "https://example.org/qr");
        assert_eq!(dto.qr_url, "https://example.org/qr?r=Lobby%201");
    }

    #[test]
    fn test_upsert_dto_defaults_and_trims() {
        let dto: UpsertRestroomDto =
            serde_json::from_str(r#"{"displayName":"  Lobby  ","zone":"  ","floor":"2"}"#)
                .unwrap();
        assert!(dto.active);

        let restroom = dto.into_restroom("L-2");
        assert_eq!(restroom.display_name, "Lobby");
        assert_eq!(restroom.zone, None);
        assert_eq!(restroom.floor.as_deref(), Some("2"));
    }

    #[test]
    fn test_upsert_dto_rejects_empty_name() {
        let dto: UpsertRestroomDto = serde_json::from_str(r#"{"displayName":""}"#).unwrap();
        assert!(dto.validate().is_err());
    }
}
