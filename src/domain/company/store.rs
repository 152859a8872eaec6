//! Backend trait for the company record store.
//!
//! The store is read-only reference data; the mailer only queries it.

use async_trait::async_trait;

use super::types::{CompanyRecord, CompanyStoreError};

/// Read-only collection of company records.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the store is shared behind an `Arc`.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Backend type identifier
    fn backend_name(&self) -> &'static str;

    /// Verify the store is reachable. Called once at startup.
    async fn health_check(&self) -> Result<(), CompanyStoreError>;

    /// Records whose `company` field contains `name`, ignoring case, in store order.
    async fn find_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, CompanyStoreError>;

    /// Release backend resources at the end of the run
    async fn close(&self) {}
}
