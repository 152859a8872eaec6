//! Mail template system.
//!
//! This module provides:
//! - Template definition with `$token$` placeholders and a `#Salutation#` marker
//! - Placeholder extraction
//! - A per-run template registry
//! - TOML template file loading
//! - Single-pass substitution for rendering subject and body
//!
//! # Example
//!
//! ```ignore
//! let mut template = Template::new(
//!     "intro",
//!     "Joining $Company$",
//!     "Hello #Salutation#, welcome to $Company$",
//! );
//! template.set_resolved("Company", "Acme".to_string());
//!
//! let rendered = render(&template, "Ms. Doe")?;
//! assert_eq!(rendered.body, "Hello Ms. Doe, welcome to Acme");
//! ```

mod placeholder;
mod source;
mod store;
mod substitution;
mod types;

pub use placeholder::{contains_marker, extract, extract_template, SALUTATION_MARKER};
pub use source::{load_dir, load_file, parse_template, template_id, LoadedTemplate};
pub use store::TemplateStore;
pub use substitution::{render, render_text, substitute_tokens};
pub use types::{RenderedEmail, Template, TemplateError, TemplateResult};
