use chrono::Duration;
use satnexus_engine::{
    AccessControl, Accounts, ChangeAnalysisEngine, ImageCatalog, NotificationHub, OwnerDirectory,
    SimulatedDetector,
};
use satnexus_store::memory::{MemoryAnalysisStore, MemoryImageStore, MemoryUserStore};
use satnexus_store::ports::{AnalysisStore, ImageStore, UserStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::storage::LocalImageStorage;

#[derive(Clone)]
pub struct AppState {
    pub engine: ChangeAnalysisEngine,
    pub accounts: Accounts,
    pub access: AccessControl,
    pub hub: NotificationHub,
    pub upload_dir: PathBuf,
    pub default_page_size: u32,
}

impl AppState {
    pub fn new(
        config: &ApiConfig,
        image_store: Arc<dyn ImageStore>,
        analysis_store: Arc<dyn AnalysisStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let storage = LocalImageStorage::new(&config.upload_dir, config.upload_policy.clone());
        let catalog = ImageCatalog::new(image_store, Arc::new(storage))
            .with_validity(config.coordinate_validity)
            .with_owners(OwnerDirectory::new(user_store.clone()));

        let hub = NotificationHub::new();
        let engine = ChangeAnalysisEngine::new(
            catalog,
            analysis_store,
            Arc::new(SimulatedDetector::new()),
            Arc::new(hub.clone()),
        )
        .with_area_mode(config.area_mode);

        let token_ttl = Duration::hours(i64::from(config.token_ttl_hours));

        Self {
            engine,
            accounts: Accounts::new(user_store.clone(), config.jwt_secret.clone(), token_ttl),
            access: AccessControl::jwt(&config.jwt_secret, user_store),
            hub,
            upload_dir: config.upload_dir.clone(),
            default_page_size: config.default_page_size,
        }
    }

    /// State backed by the in-memory stores
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryImageStore::new()),
            Arc::new(MemoryAnalysisStore::new()),
            Arc::new(MemoryUserStore::new()),
        )
    }

    pub fn catalog(&self) -> &ImageCatalog {
        self.engine.catalog()
    }
}
