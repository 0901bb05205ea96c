// Library crate for the cafe directory server
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod cafe;
pub mod config;
pub mod database;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use auth::{password::Argon2Hasher, token::TokenConfig, AuthClaims};
pub use cafe::{
    models::CafeModel,
    repository::{CafeRepository, InMemoryCafeRepository},
};
pub use config::AppConfig;
pub use shared::{AppError, AppState, AuthFailure};
pub use user::{InMemoryUserRepository, UserModel, UserRepository};
