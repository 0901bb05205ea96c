use async_trait::async_trait;

use cafe_directory::{AppError, CafeModel, CafeRepository};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Repository whose every call fails the way a dropped database connection would
pub struct FailingCafeRepository;

fn unavailable() -> AppError {
    AppError::DatabaseError("connection reset by peer at 10.1.2.3:5432".to_string())
}

#[async_trait]
impl CafeRepository for FailingCafeRepository {
    async fn create_cafe(&self, _cafe: &CafeModel) -> Result<(), AppError> {
        Err(unavailable())
    }
    async fn list_cafes(&self) -> Result<Vec<CafeModel>, AppError> {
        Err(unavailable())
    }
    async fn get_cafe(&self, _cafe_id: &str) -> Result<Option<CafeModel>, AppError> {
        Err(unavailable())
    }
    async fn update_cafe(&self, _cafe: &CafeModel) -> Result<(), AppError> {
        Err(unavailable())
    }
    async fn delete_owned_cafe(&self, _cafe_id: &str, _owner_id: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }
}
