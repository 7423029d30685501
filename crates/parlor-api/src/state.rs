//! Application state wiring the store layer to its SQLite backend.
//!
//! Startup sequencing lives here: resolve the data directory, load
//! config, open the database pool, then hydrate every store before any
//! command runs. Hydration failure aborts startup -- the process never
//! serves from an unhydrated store.

use parlor_core::store::StoreContext;
use parlor_infra::config::{database_url, load_config, resolve_data_dir};
use parlor_infra::sqlite::{DatabasePool, SqliteDatastore};
use parlor_types::config::AppConfig;

/// Store context pinned to the SQLite backend.
pub type Stores = StoreContext<SqliteDatastore>;

/// Shared application state handed to every command handler.
pub struct AppState {
    pub stores: Stores,
    pub config: AppConfig,
}

impl AppState {
    /// Initialize the application: config, database, store hydration.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;
        tracing::debug!(dir = %data_dir.display(), "resolved data directory");

        let config = load_config(&data_dir).await;
        let pool = DatabasePool::new(&database_url(&data_dir, &config)).await?;
        let datastore = SqliteDatastore::new(pool);

        // Bulk load completes before the first store operation is served.
        let stores = Stores::hydrate(datastore).await?;

        Ok(Self { stores, config })
    }
}
