use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::input::DefaultsTable;
use crate::person::FallbackTitle;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mailer: MailerConfig,
    #[serde(default)]
    pub defaults: DefaultsTable,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub salutation: SalutationConfig,
    #[serde(default)]
    pub company: CompanyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    /// Sender identity handed to the delivery collaborator
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Directory scanned for `*.toml` template files
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Directory attachment names are resolved against
    #[serde(default = "default_attachments_dir")]
    pub attachments_dir: PathBuf,
    /// Write Prometheus text exposition here after the run (optional)
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
    /// Append the résumé to every message
    #[serde(default)]
    pub attach_resume: bool,
    /// Résumé file extension; the attachment is `resume.<format>`
    #[serde(default = "default_resume_format")]
    pub resume_format: String,
}

impl MailerConfig {
    /// Résumé attachment name, if résumés are attached
    pub fn resume_attachment(&self) -> Option<String> {
        let format = self.resume_format.trim().trim_start_matches('.');
        (self.attach_resume && !format.is_empty()).then(|| format!("resume.{}", format))
    }
}

fn default_sender() -> String {
    "recruit-mailer@localhost".to_string()
}

fn default_resume_format() -> String {
    "pdf".to_string()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_attachments_dir() -> PathBuf {
    PathBuf::from("attachments")
}

/// Company record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend type: "memory" or "postgres"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// JSON file with company records (memory backend)
    #[serde(default)]
    pub records_path: Option<PathBuf>,
    /// PostgreSQL connection URL (postgres backend)
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost:5432/email_formats".to_string()
}

fn default_pool_size() -> u32 {
    2
}

fn default_connect_timeout() -> u32 {
    5 // 5 seconds
}

fn default_idle_timeout() -> u32 {
    60 // 1 minute
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalutationConfig {
    /// Title used for two-token names: "male", "female" or "unknown"
    #[serde(default)]
    pub fallback: FallbackTitle,
    /// Salutation substituted when a name cannot be parsed. Unset aborts the target.
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// Strategy applied when a company lookup matches several records
    #[serde(default = "default_disambiguation")]
    pub disambiguation: String,
}

fn default_disambiguation() -> String {
    "first".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("store.backend", "memory")?
            .set_default("company.disambiguation", "first")?
            .set_default("salutation.fallback", "unknown")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // MAILER_DEFAULTS__AUTHOR, MAILER_STORE__URL, etc.
            .add_source(
                Environment::with_prefix("MAILER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            templates_dir: default_templates_dir(),
            attachments_dir: default_attachments_dir(),
            metrics_path: None,
            attach_resume: false,
            resume_format: default_resume_format(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            records_path: None,
            url: default_database_url(),
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            disambiguation: default_disambiguation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let mailer = MailerConfig::default();
        assert_eq!(mailer.templates_dir, PathBuf::from("templates"));
        assert_eq!(mailer.attachments_dir, PathBuf::from("attachments"));
        assert!(mailer.metrics_path.is_none());
        assert!(mailer.resume_attachment().is_none());

        let store = StoreConfig::default();
        assert_eq!(store.backend, "memory");
        assert_eq!(store.pool_size, 2);

        assert_eq!(CompanyConfig::default().disambiguation, "first");
        assert_eq!(SalutationConfig::default().fallback, FallbackTitle::Unknown);
    }

    #[test]
    fn test_resume_attachment() {
        let mut mailer = MailerConfig {
            attach_resume: true,
            ..MailerConfig::default()
        };
        assert_eq!(mailer.resume_attachment().as_deref(), Some("resume.pdf"));

        mailer.resume_format = ".docx".to_string();
        assert_eq!(mailer.resume_attachment().as_deref(), Some("resume.docx"));

        mailer.resume_format = String::new();
        assert!(mailer.resume_attachment().is_none());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            [defaults]
            author = "Sam Carter"
            company_name = "Acme"

            [salutation]
            fallback = "female"
            default = "Hiring Team"

            [company]
            disambiguation = "best"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.defaults.author, "Sam Carter");
        assert_eq!(settings.defaults.company_name, "Acme");
        assert_eq!(settings.salutation.fallback, FallbackTitle::Female);
        assert_eq!(settings.salutation.default.as_deref(), Some("Hiring Team"));
        assert_eq!(settings.company.disambiguation, "best");
        assert_eq!(settings.store.backend, "memory");
    }
}
