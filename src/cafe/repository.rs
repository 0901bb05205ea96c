use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{CafeDetails, CafeModel, OpeningHours};
use crate::shared::AppError;

/// Trait for café repository operations; each call touches a single record
#[async_trait]
pub trait CafeRepository {
    async fn create_cafe(&self, cafe: &CafeModel) -> Result<(), AppError>;
    /// Every café, oldest first
    async fn list_cafes(&self) -> Result<Vec<CafeModel>, AppError>;
    async fn get_cafe(&self, cafe_id: &str) -> Result<Option<CafeModel>, AppError>;
    async fn update_cafe(&self, cafe: &CafeModel) -> Result<(), AppError>;
    /// Deletes the café only if `owner_id` created it; returns whether a record was removed
    async fn delete_owned_cafe(&self, cafe_id: &str, owner_id: &str) -> Result<bool, AppError>;
}

/// In-memory implementation of CafeRepository for development and testing
pub struct InMemoryCafeRepository {
    cafes: Mutex<HashMap<String, CafeModel>>,
}

impl Default for InMemoryCafeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCafeRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            cafes: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated cafés
    pub fn with_cafes(cafes: Vec<CafeModel>) -> Self {
        let cafe_map = cafes
            .into_iter()
            .map(|cafe| (cafe.id.clone(), cafe))
            .collect();

        Self {
            cafes: Mutex::new(cafe_map),
        }
    }

    /// Returns the current number of cafés in the repository
    pub fn cafe_count(&self) -> usize {
        self.cafes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl CafeRepository for InMemoryCafeRepository {
    #[instrument(skip(self, cafe))]
    async fn create_cafe(&self, cafe: &CafeModel) -> Result<(), AppError> {
        debug!(cafe_id = %cafe.id, name = %cafe.details.name, "Creating cafe in memory");

        let mut cafes = self.cafes.lock().map_err(|_| AppError::Internal)?;
        if cafes.contains_key(&cafe.id) {
            warn!(cafe_id = %cafe.id, "Cafe already exists in memory");
            return Err(AppError::DatabaseError("Cafe already exists".to_string()));
        }
        cafes.insert(cafe.id.clone(), cafe.clone());

        debug!(cafe_id = %cafe.id, "Cafe created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_cafes(&self) -> Result<Vec<CafeModel>, AppError> {
        debug!("Listing all cafes in memory");

        let cafes = self.cafes.lock().map_err(|_| AppError::Internal)?;
        let mut cafe_list: Vec<CafeModel> = cafes.values().cloned().collect();
        cafe_list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        debug!(cafe_count = cafe_list.len(), "Cafes listed successfully in memory");
        Ok(cafe_list)
    }

    #[instrument(skip(self))]
    async fn get_cafe(&self, cafe_id: &str) -> Result<Option<CafeModel>, AppError> {
        debug!(cafe_id = %cafe_id, "Fetching cafe from memory");

        let cafes = self.cafes.lock().map_err(|_| AppError::Internal)?;
        let cafe = cafes.get(cafe_id).cloned();

        match &cafe {
            Some(c) => debug!(cafe_id = %cafe_id, name = %c.details.name, "Cafe found in memory"),
            None => debug!(cafe_id = %cafe_id, "Cafe not found in memory"),
        }

        Ok(cafe)
    }

    #[instrument(skip(self, cafe))]
    async fn update_cafe(&self, cafe: &CafeModel) -> Result<(), AppError> {
        debug!(cafe_id = %cafe.id, "Updating cafe in memory");

        let mut cafes = self.cafes.lock().map_err(|_| AppError::Internal)?;
        match cafes.get_mut(&cafe.id) {
            Some(stored) => *stored = cafe.clone(),
            None => {
                warn!(cafe_id = %cafe.id, "Cafe not found for update in memory");
                return Err(AppError::NotFound("Cafe not found".to_string()));
            }
        }

        debug!(cafe_id = %cafe.id, "Cafe updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_owned_cafe(&self, cafe_id: &str, owner_id: &str) -> Result<bool, AppError> {
        debug!(cafe_id = %cafe_id, owner_id = %owner_id, "Deleting owned cafe from memory");

        let mut cafes = self.cafes.lock().map_err(|_| AppError::Internal)?;
        let owned = cafes
            .get(cafe_id)
            .is_some_and(|cafe| cafe.is_owned_by(owner_id));
        if !owned {
            debug!(cafe_id = %cafe_id, "No cafe with this id and owner in memory");
            return Ok(false);
        }
        cafes.remove(cafe_id);

        debug!(cafe_id = %cafe_id, "Cafe deleted successfully from memory");
        Ok(true)
    }
}

/// PostgreSQL implementation of café repository
pub struct PostgresCafeRepository {
    pool: PgPool,
}

impl PostgresCafeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CAFE_COLUMNS: &str = "id, name, description, latitude, longitude, address, phone, menu, opening_hours, owner_id, created_at, updated_at";

fn cafe_from_row(row: &PgRow) -> Result<CafeModel, sqlx::Error> {
    let Json(opening_hours): Json<OpeningHours> = row.try_get("opening_hours")?;

    Ok(CafeModel {
        id: row.try_get("id")?,
        details: CafeDetails {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            menu: row.try_get("menu")?,
            opening_hours,
        },
        created_by: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CafeRepository for PostgresCafeRepository {
    #[instrument(skip(self, cafe))]
    async fn create_cafe(&self, cafe: &CafeModel) -> Result<(), AppError> {
        debug!(cafe_id = %cafe.id, name = %cafe.details.name, "Creating cafe in database");

        sqlx::query(&format!(
            "INSERT INTO cafes ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            CAFE_COLUMNS
        ))
        .bind(&cafe.id)
        .bind(&cafe.details.name)
        .bind(&cafe.details.description)
        .bind(cafe.details.latitude)
        .bind(cafe.details.longitude)
        .bind(&cafe.details.address)
        .bind(&cafe.details.phone)
        .bind(&cafe.details.menu)
        .bind(Json(&cafe.details.opening_hours))
        .bind(&cafe.created_by)
        .bind(cafe.created_at)
        .bind(cafe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create cafe in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(cafe_id = %cafe.id, "Cafe created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_cafes(&self) -> Result<Vec<CafeModel>, AppError> {
        debug!("Listing all cafes in database");

        let rows = sqlx::query(&format!(
            "SELECT {} FROM cafes ORDER BY created_at, id",
            CAFE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list cafes from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let cafes = rows
            .iter()
            .map(cafe_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                warn!(error = %e, "Failed to decode cafe rows");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(cafe_count = cafes.len(), "Cafes listed successfully from database");
        Ok(cafes)
    }

    #[instrument(skip(self))]
    async fn get_cafe(&self, cafe_id: &str) -> Result<Option<CafeModel>, AppError> {
        debug!(cafe_id = %cafe_id, "Fetching cafe from database");

        let row = sqlx::query(&format!("SELECT {} FROM cafes WHERE id = $1", CAFE_COLUMNS))
            .bind(cafe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, cafe_id = %cafe_id, "Failed to fetch cafe from database");
                AppError::DatabaseError(e.to_string())
            })?;

        row.as_ref()
            .map(cafe_from_row)
            .transpose()
            .map_err(|e| {
                warn!(error = %e, cafe_id = %cafe_id, "Failed to decode cafe row");
                AppError::DatabaseError(e.to_string())
            })
    }

    #[instrument(skip(self, cafe))]
    async fn update_cafe(&self, cafe: &CafeModel) -> Result<(), AppError> {
        debug!(cafe_id = %cafe.id, "Updating cafe in database");

        let result = sqlx::query(
            "UPDATE cafes SET name = $2, description = $3, latitude = $4, longitude = $5, address = $6, phone = $7, menu = $8, opening_hours = $9, updated_at = $10 WHERE id = $1",
        )
        .bind(&cafe.id)
        .bind(&cafe.details.name)
        .bind(&cafe.details.description)
        .bind(cafe.details.latitude)
        .bind(cafe.details.longitude)
        .bind(&cafe.details.address)
        .bind(&cafe.details.phone)
        .bind(&cafe.details.menu)
        .bind(Json(&cafe.details.opening_hours))
        .bind(cafe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, cafe_id = %cafe.id, "Failed to update cafe in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(cafe_id = %cafe.id, "Cafe not found for update");
            return Err(AppError::NotFound("Cafe not found".to_string()));
        }

        debug!(cafe_id = %cafe.id, "Cafe updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_owned_cafe(&self, cafe_id: &str, owner_id: &str) -> Result<bool, AppError> {
        debug!(cafe_id = %cafe_id, owner_id = %owner_id, "Deleting owned cafe from database");

        let result = sqlx::query("DELETE FROM cafes WHERE id = $1 AND owner_id = $2")
            .bind(cafe_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, cafe_id = %cafe_id, "Failed to delete cafe from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let deleted = result.rows_affected() > 0;
        debug!(cafe_id = %cafe_id, deleted, "Owned cafe delete finished in database");
        Ok(deleted)
    }
}
