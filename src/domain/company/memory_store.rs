//! In-memory company record store.
//!
//! Records are loaded from a JSON array file at startup (or supplied
//! directly) and kept in file order.

use std::path::Path;

use async_trait::async_trait;

use super::store::CompanyStore;
use super::types::{CompanyRecord, CompanyStoreError};

pub struct MemoryCompanyStore {
    records: Vec<CompanyRecord>,
}

impl MemoryCompanyStore {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of company records
    pub fn from_json_str(json: &str) -> Result<Self, CompanyStoreError> {
        let records: Vec<CompanyRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Load a JSON array of company records from `path`
    pub fn from_json_file(path: &Path) -> Result<Self, CompanyStoreError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            records = store.len(),
            "Loaded company records"
        );

        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), CompanyStoreError> {
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, CompanyStoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.matches(name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MemoryCompanyStore {
        MemoryCompanyStore::new(vec![
            CompanyRecord::new("Acme Corp", "firstname.lastname", "acme.com"),
            CompanyRecord::new("Initech", "firstinitiallastname", "initech.com"),
            CompanyRecord::new("ACME Labs", "firstname", "acmelabs.io"),
        ])
    }

    #[tokio::test]
    async fn test_find_by_name_returns_all_matches_in_order() {
        let store = sample_store();

        let found = store.find_by_name("acme").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].company, "Acme Corp");
        assert_eq!(found[1].company, "ACME Labs");
    }

    #[tokio::test]
    async fn test_close_keeps_records() {
        let store = sample_store();
        store.close().await;
        assert_eq!(store.find_by_name("initech").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_name_no_match() {
        let store = sample_store();
        assert!(store.find_by_name("Globex").await.unwrap().is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let store = MemoryCompanyStore::from_json_str(
            r#"[{"company": "Acme", "format": "firstname", "domain": "acme.com"}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);

        assert!(matches!(
            MemoryCompanyStore::from_json_str("{not json"),
            Err(CompanyStoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MemoryCompanyStore::from_json_file(&dir.path().join("missing.json")),
            Err(CompanyStoreError::Io(_))
        ));
    }
}
