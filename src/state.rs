use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::users::{AccountService, MemoryUserStore, PasswordHasher, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn UserStore> = match config.store_backend {
            StoreBackend::Postgres => Arc::new(PgUserStore::new(db::connect(&config).await?)),
            StoreBackend::Memory => {
                tracing::warn!("using in-memory user store; data is lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };
        Ok(Self::from_parts(Arc::new(config), store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn UserStore>) -> Self {
        let accounts = Arc::new(AccountService::new(store, PasswordHasher::new()));
        Self { config, accounts }
    }

    /// State over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(AppConfig::memory()),
            Arc::new(MemoryUserStore::new()),
        )
    }
}
