use std::sync::Arc;

use crate::{config::AppConfig, db::StoreHealth, services::ServiceContext};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: ServiceContext,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        services: ServiceContext,
        health: Arc<dyn StoreHealth>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            services,
            health,
        })
    }
}
