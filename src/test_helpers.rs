use std::sync::Arc;

use axum::Router;

use crate::{
    auth::{jwt::JwtKeys, password::PasswordHasher},
    config::AppConfig,
    db::MemoryStore,
    routes::app,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "attendify-integration-test-secret";

/// Full application over an in-memory store, with the store kept around so
/// tests can inspect or break it.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub keys: JwtKeys,
}

pub fn test_app() -> TestApp {
    let store = MemoryStore::new();
    let repos = store.repositories();
    let keys = JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes());

    let config = AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };
    let services = ServiceContext::new(&repos, keys.clone(), PasswordHasher::fast());
    let state = AppState::new(config, services, Arc::clone(&repos.health));

    TestApp {
        router: app(state),
        store,
        keys,
    }
}

pub fn test_router() -> Router {
    test_app().router
}
