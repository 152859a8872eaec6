//! Template type definitions

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::placeholder::extract_template;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Failed to parse template {template}: {reason}")]
    Parse { template: String, reason: String },

    #[error("Failed to read template {template}: {source}")]
    Io {
        template: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unresolved placeholder ${token}$ in template {template}")]
    Unresolved { template: String, token: String },

    #[error("Rendered {field} of template {template} still contains a marker")]
    MarkerRemaining {
        template: String,
        field: &'static str,
    },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A parameterized message template.
///
/// `values` maps token names to resolved values; an empty string means the
/// token has not been resolved yet (or was resolved to empty, see
/// [`Template::is_resolved`]).
#[derive(Debug, Clone)]
pub struct Template {
    /// Template identifier (file name without extension)
    pub id: String,

    /// Subject text with `$token$` and `#Salutation#` markers
    pub subject: String,

    /// Body text with `$token$` and `#Salutation#` markers
    pub body: String,

    /// Recipient identifiers, in file order
    pub targets: Vec<String>,

    /// Attachment file names, relative to the attachments directory
    pub attachments: Vec<String>,

    /// Token name -> value
    pub values: BTreeMap<String, String>,

    /// Tokens that went through resolution for this template
    resolved: BTreeSet<String>,

    /// When the template was loaded
    pub loaded_at: DateTime<Utc>,
}

impl Template {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
            targets: Vec::new(),
            attachments: Vec::new(),
            values: BTreeMap::new(),
            resolved: BTreeSet::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attachments<I, S>(mut self, attachments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments = attachments.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-seed a token value
    pub fn with_value(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(token.into(), value.into());
        self
    }

    /// Validate the template. The ID is a file stem, so only emptiness is rejected.
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.trim().is_empty() {
            return Err(TemplateError::InvalidId("ID must not be empty".to_string()));
        }

        Ok(())
    }

    /// Distinct token names used in subject and body
    pub fn tokens(&self) -> BTreeSet<String> {
        extract_template(&self.subject, &self.body)
    }

    /// Give every token exactly one entry in `values`.
    ///
    /// Pre-seeded values whose key differs from the token only in ASCII case
    /// are carried over to the token's own spelling.
    pub fn ensure_tokens(&mut self) {
        for token in self.tokens() {
            if self.values.contains_key(&token) {
                continue;
            }
            let seeded = self
                .values
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&token))
                .map(|(_, value)| value.clone())
                .unwrap_or_default();
            self.values.insert(token, seeded);
        }
    }

    /// Value for `token`, if any entry exists
    pub fn value(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    /// Look up a value by token name ignoring ASCII case, skipping empty values
    pub fn value_ignore_case(&self, token: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(token) && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Record the resolved value for `token`
    pub fn set_resolved(&mut self, token: &str, value: String) {
        self.values.insert(token.to_string(), value);
        self.resolved.insert(token.to_string());
    }

    /// Whether `token` already went through resolution for this template
    pub fn is_resolved(&self, token: &str) -> bool {
        self.resolved.contains(token)
    }
}

/// Final subject and body handed to delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}
