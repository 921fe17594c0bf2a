use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccessService, AccountService, CatalogService, CommentService, ReadingService,
    SeaOrmAccessService, SeaOrmAccountService, SeaOrmCatalogService, SeaOrmCommentService,
    SeaOrmReadingService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub access_service: Arc<dyn AccessService>,

    pub account_service: Arc<dyn AccountService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub reading_service: Arc<dyn ReadingService>,

    pub comment_service: Arc<dyn CommentService>,
}

impl SharedState {
    /// Opens the database (running migrations) and wires the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let access_service = Arc::new(SeaOrmAccessService::new(store.clone()));
        let account_service = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config.security.clone(),
        ));
        let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()));
        let reading_service = Arc::new(SeaOrmReadingService::new(store.clone()));
        let comment_service = Arc::new(SeaOrmCommentService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            access_service,
            account_service,
            catalog_service,
            reading_service,
            comment_service,
        }
    }
}
