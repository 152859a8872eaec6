//! Placeholder extraction

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Marker replaced with the per-target salutation
pub const SALUTATION_MARKER: &str = "#Salutation#";

lazy_static! {
    /// `$token$`, token body restricted to ASCII letters
    pub(crate) static ref PLACEHOLDER: Regex = Regex::new(r"\$([A-Za-z]+)\$").unwrap();
}

/// Distinct token names appearing in `text`
pub fn extract(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Union of the token names in a template's subject and body
pub fn extract_template(subject: &str, body: &str) -> BTreeSet<String> {
    let mut tokens = extract(subject);
    tokens.extend(extract(body));
    tokens
}

/// Whether `text` still contains a placeholder or the salutation marker
pub fn contains_marker(text: &str) -> bool {
    PLACEHOLDER.is_match(text) || text.contains(SALUTATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        let tokens = extract("Hello $Name$, welcome to $Company$");
        assert_eq!(
            tokens.into_iter().collect::<Vec<_>>(),
            vec!["Company".to_string(), "Name".to_string()]
        );
    }

    #[test]
    fn test_extract_collapses_duplicates() {
        let tokens = extract("$A$ $A$ $B$ $A$");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_extract_is_order_independent_and_idempotent() {
        let forward = extract("$Position$ at $Company$ via $Author$");
        let reversed = extract("$Author$ $Company$ $Company$ $Position$");
        assert_eq!(forward, reversed);

        let joined: String = forward.iter().map(|t| format!("${}$", t)).collect();
        assert_eq!(extract(&joined), forward);
    }

    #[test]
    fn test_extract_ignores_non_alphabetic_bodies() {
        assert!(extract("costs $100$ or $ $ or $first_name$").is_empty());
        assert!(extract("no tokens here").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_extract_case_is_preserved() {
        let tokens = extract("$company$ $Company$");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_extract_template_unions_subject_and_body() {
        let tokens = extract_template("Re: $Position$", "Dear #Salutation#, $Author$ here $Position$");
        assert!(tokens.contains("Position"));
        assert!(tokens.contains("Author"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_contains_marker() {
        assert!(contains_marker("Hi $Name$"));
        assert!(contains_marker("Hi #Salutation#"));
        assert!(!contains_marker("Hi Jane, that's $5"));
    }
}
