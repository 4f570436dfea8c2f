use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::restrooms::dtos::{RestroomDto, UpsertRestroomDto};
use crate::features::restrooms::models::Restroom;
use crate::modules::store::ReportStore;
use crate::shared::validation::RESTROOM_ID_REGEX;

/// Service for the restroom catalog
pub struct RestroomService {
    store: Arc<dyn ReportStore>,
    qr_base_url: String,
}

impl RestroomService {
    pub fn new(store: Arc<dyn ReportStore>, qr_base_url: impl Into<String>) -> Self {
        Self {
            store,
            qr_base_url: qr_base_url.into(),
        }
    }

    /// Built-in catalog upserted by the startup seed
    pub fn default_restrooms() -> Vec<Restroom> {
        let entry = |id: &str, name: &str, zone: &str, floor: &str, sex: &str| Restroom {
            id: id.to_string(),
            display_name: name.to_string(),
            zone: Some(zone.to_string()),
            floor: Some(floor.to_string()),
            sex_designation: Some(sex.to_string()),
            active: true,
        };

        vec![
            entry("B-A1-H1", "Baño Hombres Ala 1 - Piso 1", "Ala 1", "1", "Hombres"),
            entry("B-A1-M1", "Baño Mujeres Ala 1 - Piso 1", "Ala 1", "1", "Mujeres"),
            entry("B-A2-H2", "Baño Hombres Ala 2 - Piso 2", "Ala 2", "2", "Hombres"),
        ]
    }

    /// Catalog listing ordered by zone, floor, display name
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<RestroomDto>> {
        let restrooms = self.store.list_restrooms(include_inactive).await?;
        Ok(restrooms
            .into_iter()
            .map(|r| RestroomDto::from_restroom(r, &self.qr_base_url))
            .collect())
    }

    /// QR landing lookup. Missing and inactive restrooms are both 404.
    pub async fn get_active(&self, id: &str) -> Result<RestroomDto> {
        self.store
            .get_restroom(id)
            .await?
            .filter(|r| r.active)
            .map(|r| RestroomDto::from_restroom(r, &self.qr_base_url))
            .ok_or_else(|| AppError::NotFound(format!("Restroom '{}' not found", id)))
    }

    pub async fn upsert(&self, id: &str, dto: UpsertRestroomDto) -> Result<RestroomDto> {
        let id = id.trim();
        if !RESTROOM_ID_REGEX.is_match(id) {
            return Err(AppError::Validation(format!(
                "Invalid restroom id '{}': use letters, digits, '.', '-' or '_'",
                id
            )));
        }

        let restroom = dto.into_restroom(id);
        if restroom.display_name.is_empty() {
            return Err(AppError::Validation(
                "displayName must not be blank".to_string(),
            ));
        }

        let saved = self.store.upsert_restroom(&restroom).await?;
        info!("Restroom upserted: id={}, active={}", saved.id, saved.active);

        Ok(RestroomDto::from_restroom(saved, &self.qr_base_url))
    }

    /// Delete a restroom that has never received reports
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_restroom(id).await? {
            return Err(AppError::NotFound(format!("Restroom '{}' not found", id)));
        }
        info!("Restroom deleted: id={}", id);
        Ok(())
    }

    /// Upsert the built-in catalog; returns the number of entries written
    pub async fn seed_defaults(&self) -> Result<usize> {
        let defaults = Self::default_restrooms();
        for restroom in &defaults {
            self.store.upsert_restroom(restroom).await?;
        }
        info!("Seeded {} default restrooms", defaults.len());
        Ok(defaults.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seeded_store, QR_BASE_URL};

    async fn service() -> RestroomService {
        RestroomService::new(seeded_store().await, QR_BASE_URL)
    }

    fn upsert_dto(name: &str, active: bool) -> UpsertRestroomDto {
        UpsertRestroomDto {
            display_name: name.to_string(),
            zone: Some("Ala 3".to_string()),
            floor: Some("1".to_string()),
            sex_designation: None,
            active,
        }
    }

    #[tokio::test]
    async fn test_list_active_only_in_catalog_order() {
        let restrooms = service().await.list(false).await.unwrap();
        let ids: Vec<&str> = restrooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B-A1-H1", "B-A1-M1", "B-A2-H2"]);
        assert_eq!(restrooms[0].qr_url, format!("{}?r=B-A1-H1", QR_BASE_URL));
    }

    #[tokio::test]
    async fn test_list_with_inactive() {
        let restrooms = service().await.list(true).await.unwrap();
        assert!(restrooms.iter().any(|r| !r.active));
    }

    #[tokio::test]
    async fn test_get_active_hides_inactive() {
        let service = service().await;
        assert_eq!(service.get_active("B-A1-M1").await.unwrap().zone.as_deref(), Some("Ala 1"));
        assert!(matches!(
            service.get_active("B-OLD").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_active("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let service = service().await;
        service.upsert("B-A3-X1", upsert_dto("Unisex", true)).await.unwrap();
        let updated = service
            .upsert("B-A3-X1", upsert_dto("Unisex renovated", false))
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Unisex renovated");
        assert!(!updated.active);
        assert!(service.get_active("B-A3-X1").await.is_err());
    }

    #[tokio::test]
    async fn test_upsert_rejects_bad_id_and_blank_name() {
        let service = service().await;
        assert!(matches!(
            service.upsert("bad id", upsert_dto("x", true)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.upsert("OK-1", upsert_dto("   ", true)).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let service = service().await;
        assert!(matches!(
            service.delete("missing").await,
            Err(AppError::NotFound(_))
        ));
        service.delete("B-OLD").await.unwrap();
    }

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let store: Arc<dyn ReportStore> = Arc::new(crate::modules::store::MemoryReportStore::new());
        let service = RestroomService::new(store, QR_BASE_URL);

        assert_eq!(service.seed_defaults().await.unwrap(), 3);
        assert_eq!(service.seed_defaults().await.unwrap(), 3);
        assert_eq!(service.list(true).await.unwrap().len(), 3);
    }
}
