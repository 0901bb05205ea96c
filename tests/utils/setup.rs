use std::sync::Arc;

use axum::Router;
use cafe_directory::{
    build_router, Argon2Hasher, AppState, CafeRepository, InMemoryCafeRepository,
    InMemoryUserRepository, TokenConfig,
};

pub const TEST_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub token_config: TokenConfig,
    pub users: Arc<InMemoryUserRepository>,
}

pub struct TestSetupBuilder {
    cafe_repository: Option<Arc<dyn CafeRepository + Send + Sync>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            cafe_repository: None,
        }
    }

    pub fn with_cafe_repository(mut self, repo: Arc<dyn CafeRepository + Send + Sync>) -> Self {
        self.cafe_repository = Some(repo);
        self
    }

    pub fn build(self) -> TestSetup {
        let users = Arc::new(InMemoryUserRepository::new());
        let cafes = self
            .cafe_repository
            .unwrap_or_else(|| Arc::new(InMemoryCafeRepository::new()));
        let token_config = TokenConfig::new(TEST_SECRET, 1);

        let state = AppState::new(
            users.clone(),
            cafes,
            token_config.clone(),
            Arc::new(Argon2Hasher::lightweight()),
        );

        TestSetup {
            router: build_router(state),
            token_config,
            users,
        }
    }
}
