//! Token value resolution and interactive input.

mod prompt;
mod resolver;

pub use prompt::{trim_newline, CannedPrompt, Prompt, TerminalPrompt};
pub use resolver::{DefaultsTable, InputError, InputResolver, ResolveStats};
