//! Company record types and errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::postgres::PostgresPoolError;

/// Errors raised by a company record store backend.
#[derive(Debug, Error)]
pub enum CompanyStoreError {
    #[error("Unknown company store backend: {0}")]
    UnknownBackend(String),

    #[error("Failed to read company records: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid company records: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresPoolError),
}

impl From<sqlx::Error> for CompanyStoreError {
    fn from(err: sqlx::Error) -> Self {
        CompanyStoreError::Postgres(PostgresPoolError::Sqlx(err))
    }
}

/// Errors from company lookup and disambiguation.
#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("Company '{0}' not found")]
    NotFound(String),

    #[error("Company '{query}' is ambiguous: {count} records match")]
    AmbiguousMatch { query: String, count: usize },

    #[error("Invalid company selection '{input}' for '{query}'")]
    InvalidSelection { query: String, input: String },

    #[error("Company selection prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] CompanyStoreError),
}

/// An organization's email-address convention.
///
/// `address_format` uses the symbolic tokens `firstname`, `lastname`,
/// `firstinitial` and `lastinitial`, e.g. `firstname.lastinitial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub company: String,
    #[serde(default)]
    pub metro: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "format", alias = "address_format")]
    pub address_format: String,
    pub domain: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub phone: String,
}

impl CompanyRecord {
    pub fn new(
        company: impl Into<String>,
        address_format: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            metro: String::new(),
            state: String::new(),
            address_format: address_format.into(),
            domain: domain.into(),
            example: String::new(),
            notes: String::new(),
            phone: String::new(),
        }
    }

    pub fn with_location(mut self, metro: impl Into<String>, state: impl Into<String>) -> Self {
        self.metro = metro.into();
        self.state = state.into();
        self
    }

    /// Case-insensitive substring match against the company name
    pub fn matches(&self, query: &str) -> bool {
        self.company.to_lowercase().contains(&query.to_lowercase())
    }

    /// One-line description used in logs and selection prompts
    pub fn describe(&self) -> String {
        let location = match (self.metro.is_empty(), self.state.is_empty()) {
            (false, false) => format!(" ({}, {})", self.metro, self.state),
            (false, true) => format!(" ({})", self.metro),
            (true, false) => format!(" ({})", self.state),
            (true, true) => String::new(),
        };
        format!(
            "{}{} - {}@{}",
            self.company, location, self.address_format, self.domain
        )
    }
}

/// Outcome of resolving a company name to a single record
#[derive(Debug, Clone)]
pub struct Resolution {
    pub record: CompanyRecord,
    /// Number of records that matched the query
    pub candidates: usize,
    /// Strategy that picked `record` when more than one matched
    pub strategy: Option<&'static str>,
}

impl Resolution {
    pub fn was_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}
