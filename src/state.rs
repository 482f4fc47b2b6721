//! Shared application state for all routes.

use crate::config::Settings;
use crate::rate_limit::FixedWindowLimiter;
use crate::service::{
    HeroRepository, InventoryLocks, InventoryService, ItemRepository, QuestRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: Arc<Settings>,
    /// Shared by every inventory write so capacity checks and item writes are serialized.
    pub inventory_locks: InventoryLocks,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        let rate_limiter = FixedWindowLimiter::new(
            settings.rate_limit_max,
            Duration::from_secs(settings.rate_limit_window_secs),
        );
        AppState {
            pool,
            settings: Arc::new(settings),
            inventory_locks: InventoryLocks::new(),
            rate_limiter: Arc::new(rate_limiter),
        }
    }

    pub fn heroes(&self) -> HeroRepository {
        HeroRepository::new(self.pool.clone())
    }

    pub fn quests(&self) -> QuestRepository {
        QuestRepository::new(self.pool.clone())
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }

    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.pool.clone(), self.inventory_locks.clone())
    }
}
