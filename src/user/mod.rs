// Credential store: persisted user records
pub use models::UserModel;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};

pub mod models;
pub mod repository;
