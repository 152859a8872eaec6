//! Template file source
//!
//! One TOML record per file:
//!
//! ```toml
//! Targets = ["Jane Doe @ Acme", "Dr John Smith <jsmith@example.com>"]
//! Subject = "$Position$ application"
//! Body = "Dear #Salutation#, ..."
//! Attachments = ["resume.pdf"]
//!
//! [Values]
//! Position = "Backend Engineer"
//! ```
//!
//! The template ID is the file name with its extension stripped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::Deserialize;

use super::types::{Template, TemplateError, TemplateResult};

/// Template file extension
pub const TEMPLATE_EXTENSION: &str = "toml";

#[derive(Debug, Deserialize)]
struct TemplateRecord {
    #[serde(rename = "Targets", alias = "targets", default)]
    targets: Vec<String>,

    #[serde(rename = "Subject", alias = "subject", default)]
    subject: String,

    #[serde(rename = "Body", alias = "body", default)]
    body: String,

    #[serde(rename = "Attachments", alias = "attachments", default)]
    attachments: Vec<String>,

    #[serde(rename = "Values", alias = "values", default)]
    values: BTreeMap<String, String>,
}

/// Result of loading one template file
#[derive(Debug)]
pub struct LoadedTemplate {
    pub id: String,
    pub path: PathBuf,
    pub result: TemplateResult<Template>,
}

/// Parse template `id` from TOML `content`
pub fn parse_template(id: &str, content: &str) -> TemplateResult<Template> {
    let parse_error = |e: config::ConfigError| TemplateError::Parse {
        template: id.to_string(),
        reason: e.to_string(),
    };

    let record: TemplateRecord = Config::builder()
        .add_source(File::from_str(content, FileFormat::Toml))
        .build()
        .map_err(parse_error)?
        .try_deserialize()
        .map_err(parse_error)?;

    if record.subject.is_empty() && record.body.is_empty() {
        return Err(TemplateError::Parse {
            template: id.to_string(),
            reason: "template has neither Subject nor Body".to_string(),
        });
    }

    let mut template = Template::new(id, record.subject, record.body)
        .with_targets(record.targets)
        .with_attachments(record.attachments);
    template.values = record.values;
    template.validate()?;
    template.ensure_tokens();

    Ok(template)
}

/// Template ID for a file path (file stem)
pub fn template_id(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Read and parse a single template file
pub fn load_file(path: &Path) -> LoadedTemplate {
    let id = template_id(path).unwrap_or_else(|| path.display().to_string());

    let result = std::fs::read_to_string(path)
        .map_err(|source| TemplateError::Io {
            template: id.clone(),
            source,
        })
        .and_then(|content| parse_template(&id, &content));

    LoadedTemplate {
        id,
        path: path.to_path_buf(),
        result,
    }
}

/// Load every `*.toml` template in `dir`, sorted by path.
///
/// Failing to list the directory is an error; a file that fails to read or
/// parse is reported in its own [`LoadedTemplate`].
pub fn load_dir(dir: &Path) -> std::io::Result<Vec<LoadedTemplate>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_template = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
        if is_template {
            paths.push(path);
        }
    }
    paths.sort();

    tracing::debug!(dir = %dir.display(), count = paths.len(), "Discovered template files");

    Ok(paths.iter().map(|path| load_file(path)).collect())
}
