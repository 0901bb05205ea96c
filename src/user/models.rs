use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserModel {
    pub id: String, // UUID v4 as string
    pub username: String,
    pub email: String, // Trimmed and lower-cased, unique
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a new user with a generated ID; the email is normalized
    pub fn new(username: String, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Canonical form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
