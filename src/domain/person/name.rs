//! Splitting free-text full names into structured parts

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Fewer than two whitespace-separated tokens
    #[error("Name not formatted correctly: {0:?}")]
    MalformedName(String),
}

/// Structured parts of a recipient's full name.
///
/// Only two shapes are recognised: `First Last` and `Title First ... Last`.
/// Compound surnames and suffixes are not supported; for a name of three or
/// more tokens the middle tokens are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub salutation_title: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Split `full_name` on whitespace, title-casing every token.
pub fn split_name(full_name: &str) -> Result<NameParts, NameError> {
    let tokens: Vec<String> = full_name.split_whitespace().map(title_case).collect();

    match tokens.as_slice() {
        [first, last] => Ok(NameParts {
            salutation_title: None,
            first_name: first.clone(),
            last_name: last.clone(),
        }),
        [title, first, .., last] => Ok(NameParts {
            salutation_title: Some(title.clone()),
            first_name: first.clone(),
            last_name: last.clone(),
        }),
        _ => Err(NameError::MalformedName(full_name.to_string())),
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
