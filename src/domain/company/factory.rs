//! Company store backend factory

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::postgres::PostgresPool;

use super::memory_store::MemoryCompanyStore;
use super::postgres_store::PostgresCompanyStore;
use super::store::CompanyStore;
use super::types::CompanyStoreError;

/// Create a company store based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"postgres"`: Connects a `PostgresCompanyStore` to `url`
/// - `"memory"` (default): Loads a `MemoryCompanyStore` from `records_path`, or
///   starts empty when no path is configured
///
/// Any failure here is fatal to the run; the store is checked for
/// reachability before it is returned.
pub async fn create_company_store(
    config: &StoreConfig,
) -> Result<Arc<dyn CompanyStore>, CompanyStoreError> {
    let store: Arc<dyn CompanyStore> = match config.backend.trim().to_lowercase().as_str() {
        "postgres" => {
            let pool = PostgresPool::new(config).await?;
            tracing::info!(
                backend = "postgres",
                url = %pool.database_url_masked(),
                "Creating PostgreSQL company store"
            );
            Arc::new(PostgresCompanyStore::new(pool.into_inner()))
        }
        "memory" => match &config.records_path {
            Some(path) => {
                tracing::info!(backend = "memory", path = %path.display(), "Creating memory company store");
                Arc::new(MemoryCompanyStore::from_json_file(path)?)
            }
            None => {
                tracing::warn!(
                    backend = "memory",
                    "No company records configured; company-based addressing will fail"
                );
                Arc::new(MemoryCompanyStore::new(Vec::new()))
            }
        },
        other => return Err(CompanyStoreError::UnknownBackend(other.to_string())),
    };

    store.health_check().await?;
    Ok(store)
}
