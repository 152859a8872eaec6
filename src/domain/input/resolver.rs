//! Token value resolution: template value, then defaults, then the prompt

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::metrics::TemplateMetrics;
use crate::template::Template;

use super::prompt::Prompt;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Prompt for '{token}' failed: {source}")]
    Prompt {
        token: String,
        #[source]
        source: std::io::Error,
    },
}

/// Process-wide fallback values, read-only after load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsTable {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub company_name: String,
}

impl DefaultsTable {
    pub fn new(author: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            company_name: company_name.into(),
        }
    }

    /// Non-empty default for `token`, matched through the synonym table
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let value = match token.to_lowercase().as_str() {
            "author" | "authorname" => &self.author,
            "company" | "companyname" => &self.company_name,
            _ => return None,
        };
        Some(value.as_str()).filter(|v| !v.is_empty())
    }
}

/// Where each token's value came from during one `resolve` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub kept: usize,
    pub defaulted: usize,
    pub prompted: usize,
}

/// Fills a template's token table.
pub struct InputResolver {
    defaults: DefaultsTable,
    prompt: Arc<dyn Prompt>,
}

impl InputResolver {
    pub fn new(defaults: DefaultsTable, prompt: Arc<dyn Prompt>) -> Self {
        Self { defaults, prompt }
    }

    /// Give every token in `template` a value.
    ///
    /// Tokens already resolved for this template, or pre-seeded with a
    /// non-empty value, are never asked for again.
    pub fn resolve(&self, template: &mut Template) -> Result<ResolveStats, InputError> {
        template.ensure_tokens();

        let mut stats = ResolveStats::default();
        for token in template.tokens() {
            let current = template.value(&token).unwrap_or_default();
            if template.is_resolved(&token) || !current.is_empty() {
                let value = current.to_string();
                template.set_resolved(&token, value);
                stats.kept += 1;
                continue;
            }

            if let Some(default) = self.defaults.lookup(&token) {
                tracing::debug!(template = %template.id, token = %token, "Token filled from defaults");
                template.set_resolved(&token, default.to_string());
                TemplateMetrics::record_defaulted();
                stats.defaulted += 1;
                continue;
            }

            let answer = self.prompt.ask(&token).map_err(|source| InputError::Prompt {
                token: token.clone(),
                source,
            })?;
            tracing::debug!(template = %template.id, token = %token, "Token filled from prompt");
            template.set_resolved(&token, answer);
            TemplateMetrics::record_prompted();
            stats.prompted += 1;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CannedPrompt;

    #[test]
    fn test_defaults_synonyms() {
        let defaults = DefaultsTable::new("Sam Carter", "Acme");

        assert_eq!(defaults.lookup("Author"), Some("Sam Carter"));
        assert_eq!(defaults.lookup("AUTHORNAME"), Some("Sam Carter"));
        assert_eq!(defaults.lookup("company"), Some("Acme"));
        assert_eq!(defaults.lookup("CompanyName"), Some("Acme"));
        assert_eq!(defaults.lookup("Position"), None);
    }

    #[test]
    fn test_empty_default_is_ignored() {
        let defaults = DefaultsTable::new("", "Acme");
        assert_eq!(defaults.lookup("Author"), None);
    }

    #[test]
    fn test_resolution_order() {
        let prompt = Arc::new(CannedPrompt::new(["Engineer\n"]));
        let resolver = InputResolver::new(DefaultsTable::new("Sam", "Acme"), prompt.clone());

        let mut template = Template::new(
            "intro",
            "$Position$ at $Company$",
            "From $Author$ re $Team$",
        )
        .with_value("Team", "Platform")
        .with_value("Author", "");

        let stats = resolver.resolve(&mut template).unwrap();

        assert_eq!(template.value("Team"), Some("Platform"));
        assert_eq!(template.value("Company"), Some("Acme"));
        assert_eq!(template.value("Author"), Some("Sam"));
        assert_eq!(template.value("Position"), Some("Engineer"));
        assert_eq!(prompt.asked(), vec!["Position".to_string()]);
        assert_eq!(
            stats,
            ResolveStats {
                kept: 1,
                defaulted: 2,
                prompted: 1
            }
        );
    }

    #[test]
    fn test_preseeded_value_beats_default() {
        let prompt = Arc::new(CannedPrompt::new(Vec::<String>::new()));
        let resolver = InputResolver::new(DefaultsTable::new("Sam", "Acme"), prompt.clone());

        let mut template = Template::new("t", "", "$Company$").with_value("Company", "Initech");
        resolver.resolve(&mut template).unwrap();

        assert_eq!(template.value("Company"), Some("Initech"));
        assert_eq!(prompt.call_count(), 0);
    }

    #[test]
    fn test_empty_answer_is_cached() {
        let prompt = Arc::new(CannedPrompt::new([""]));
        let resolver = InputResolver::new(DefaultsTable::default(), prompt.clone());

        let mut template = Template::new("t", "$Note$", "$Note$ again");
        resolver.resolve(&mut template).unwrap();
        resolver.resolve(&mut template).unwrap();

        assert_eq!(template.value("Note"), Some(""));
        assert_eq!(prompt.call_count(), 1);
    }

    #[test]
    fn test_prompt_failure_names_token() {
        let prompt = Arc::new(CannedPrompt::new(Vec::<String>::new()));
        let resolver = InputResolver::new(DefaultsTable::default(), prompt);

        let mut template = Template::new("t", "", "$Position$");
        let err = resolver.resolve(&mut template).unwrap_err();
        assert!(matches!(err, InputError::Prompt { ref token, .. } if token == "Position"));
    }
}
