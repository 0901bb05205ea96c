use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{parse_id, CafeModel},
    repository::CafeRepository,
    schema,
};
use crate::shared::{AppError, AuthFailure};
use crate::user::UserRepository;

fn cafe_not_found() -> AppError {
    AppError::NotFound("Cafe not found".to_string())
}

/// Service for café business logic: validation, partial updates and ownership
pub struct CafeService {
    repository: Arc<dyn CafeRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl CafeService {
    pub fn new(
        repository: Arc<dyn CafeRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self { repository, users }
    }

    /// Validates the body and stores a new café owned by `owner_id`
    #[instrument(skip(self, body))]
    pub async fn create_cafe(
        &self,
        owner_id: &str,
        body: &Map<String, Value>,
    ) -> Result<CafeModel, AppError> {
        if self.users.find_by_id(owner_id).await?.is_none() {
            warn!(owner_id = %owner_id, "Token refers to a user that does not exist");
            return Err(AppError::Unauthorized(AuthFailure::InvalidToken));
        }

        let details = schema::validate(body).map_err(AppError::Validation)?;
        let cafe = CafeModel::new(details, owner_id.to_string());
        debug!(cafe_id = %cafe.id, "Generated cafe ID");

        self.repository.create_cafe(&cafe).await?;

        info!(cafe_id = %cafe.id, name = %cafe.details.name, "Cafe created successfully");
        Ok(cafe)
    }

    /// Lists every café; unfiltered and unpaginated
    #[instrument(skip(self))]
    pub async fn list_cafes(&self) -> Result<Vec<CafeModel>, AppError> {
        let cafes = self.repository.list_cafes().await?;
        info!(cafe_count = cafes.len(), "Cafes retrieved successfully");
        Ok(cafes)
    }

    #[instrument(skip(self))]
    pub async fn get_cafe(&self, raw_id: &str) -> Result<CafeModel, AppError> {
        let cafe_id = parse_id(raw_id)?;
        self.repository
            .get_cafe(&cafe_id)
            .await?
            .ok_or_else(cafe_not_found)
    }

    /// Merges the patch onto the stored café and re-validates the result.
    /// Any authenticated caller may update; ownership is not checked here.
    #[instrument(skip(self, patch))]
    pub async fn update_cafe(
        &self,
        raw_id: &str,
        patch: &Map<String, Value>,
    ) -> Result<CafeModel, AppError> {
        let mut cafe = self.get_cafe(raw_id).await?;

        let mut document = cafe.to_document();
        schema::merge_patch(&mut document, patch);
        let details = schema::validate(&document).map_err(AppError::InvalidUpdate)?;

        cafe.apply(details);
        self.repository.update_cafe(&cafe).await?;

        info!(cafe_id = %cafe.id, "Cafe updated successfully");
        Ok(cafe)
    }

    /// Deletes a café the caller owns; a foreign café looks exactly like a missing one
    #[instrument(skip(self))]
    pub async fn delete_cafe(&self, raw_id: &str, caller_id: &str) -> Result<(), AppError> {
        let cafe_id = parse_id(raw_id)?;

        if !self.repository.delete_owned_cafe(&cafe_id, caller_id).await? {
            warn!(cafe_id = %cafe_id, caller_id = %caller_id, "No cafe owned by caller with this id");
            return Err(cafe_not_found());
        }

        info!(cafe_id = %cafe_id, "Cafe deleted successfully");
        Ok(())
    }
}
