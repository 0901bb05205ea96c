// Public API - what other modules can use
pub use handlers::{create_cafe, delete_cafe, get_cafe, list_cafes, update_cafe};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod schema;
pub mod service;
mod types;
