use thiserror::Error;

use crate::company::CompanyStoreError;
use crate::template::TemplateError;

/// Errors that abort the run before any mail is sent.
///
/// Per-target and per-template failures are not represented here; they are
/// reported through [`crate::pipeline::RunSummary`] instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Company store error: {0}")]
    Store(#[from] CompanyStoreError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
