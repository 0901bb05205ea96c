// Public API - what other modules can use
pub use handlers::{login, register};
pub use middleware::jwt_auth;
pub use types::AuthClaims;

// Internal modules
mod handlers;
mod middleware;
pub mod password;
pub mod service;
pub mod token;
pub mod types;
