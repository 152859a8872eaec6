//! Salutation generation from parsed names

use serde::{Deserialize, Serialize};

use super::name::{split_name, NameError, NameParts};

/// Title used when a name carries no title token of its own.
///
/// This is configuration, never inferred from the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackTitle {
    /// "Mr."
    Male,
    /// "Ms."
    Female,
    /// The first name stands in for a title ("Jane Doe")
    #[default]
    Unknown,
}

impl FallbackTitle {
    fn title_for<'a>(&self, parts: &'a NameParts) -> &'a str {
        match self {
            FallbackTitle::Male => "Mr.",
            FallbackTitle::Female => "Ms.",
            FallbackTitle::Unknown => &parts.first_name,
        }
    }
}

/// Build a salutation from a full name.
///
/// A title token in the name is used verbatim; otherwise `fallback` supplies one.
pub fn generate_salutation(full_name: &str, fallback: FallbackTitle) -> Result<String, NameError> {
    let parts = split_name(full_name)?;
    Ok(salutation_from_parts(&parts, fallback))
}

pub fn salutation_from_parts(parts: &NameParts, fallback: FallbackTitle) -> String {
    let title = match parts.salutation_title.as_deref() {
        Some(title) => title,
        None => fallback.title_for(parts),
    };
    format!("{} {}", title, parts.last_name)
}

/// How the pipeline derives salutations, including what to do with names
/// that cannot be parsed.
#[derive(Debug, Clone, Default)]
pub struct SalutationPolicy {
    pub fallback: FallbackTitle,
    /// Substituted for malformed names. `None` makes malformed names fail the target.
    pub default_salutation: Option<String>,
}

impl SalutationPolicy {
    pub fn new(fallback: FallbackTitle, default_salutation: Option<String>) -> Self {
        Self {
            fallback,
            default_salutation,
        }
    }

    pub fn salutation_for(&self, full_name: &str) -> Result<String, NameError> {
        match generate_salutation(full_name, self.fallback) {
            Ok(salutation) => Ok(salutation),
            Err(err) => match &self.default_salutation {
                Some(default) => {
                    tracing::warn!(
                        name = %full_name,
                        salutation = %default,
                        error = %err,
                        "Using configured default salutation"
                    );
                    Ok(default.clone())
                }
                None => Err(err),
            },
        }
    }
}
