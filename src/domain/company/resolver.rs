//! Company name to address-format resolution

use std::sync::Arc;

use crate::metrics::MailMetrics;

use super::disambiguation::{DisambiguationStrategy, FirstMatch};
use super::store::CompanyStore;
use super::types::{CompanyError, CompanyRecord, Resolution};

pub struct CompanyFormatResolver {
    store: Arc<dyn CompanyStore>,
    strategy: Arc<dyn DisambiguationStrategy>,
}

impl CompanyFormatResolver {
    /// Resolver using the placeholder `first` strategy
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self::with_strategy(store, Arc::new(FirstMatch))
    }

    pub fn with_strategy(
        store: Arc<dyn CompanyStore>,
        strategy: Arc<dyn DisambiguationStrategy>,
    ) -> Self {
        Self { store, strategy }
    }

    /// All records whose company name contains `name`, ignoring case.
    ///
    /// Zero matches is [`CompanyError::NotFound`].
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, CompanyError> {
        let query = name.trim();
        if query.is_empty() {
            return Err(CompanyError::NotFound(name.to_string()));
        }

        let records = self.store.find_by_name(query).await?;
        if records.is_empty() {
            return Err(CompanyError::NotFound(query.to_string()));
        }

        for record in &records {
            tracing::debug!(query = %query, record = %record.describe(), "Company record matched");
        }

        Ok(records)
    }

    /// Resolve `name` to exactly one record, disambiguating when needed.
    pub async fn resolve_one(&self, name: &str) -> Result<Resolution, CompanyError> {
        let mut records = self.find_by_name(name).await?;
        let candidates = records.len();

        if candidates == 1 {
            return Ok(Resolution {
                record: records.remove(0),
                candidates,
                strategy: None,
            });
        }

        let strategy = self.strategy.name();
        let index = self.strategy.select(name.trim(), &records)?;
        if index >= candidates {
            return Err(CompanyError::AmbiguousMatch {
                query: name.trim().to_string(),
                count: candidates,
            });
        }
        let record = records.swap_remove(index);

        MailMetrics::record_disambiguation(strategy);
        tracing::warn!(
            query = %name.trim(),
            candidates = candidates,
            strategy = strategy,
            chosen = %record.describe(),
            "Ambiguous company lookup settled by strategy"
        );

        Ok(Resolution {
            record,
            candidates,
            strategy: Some(strategy),
        })
    }
}
