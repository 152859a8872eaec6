//! Variable substitution engine for templates

use std::collections::BTreeMap;

use regex::Captures;

use super::placeholder::{contains_marker, PLACEHOLDER, SALUTATION_MARKER};
use super::types::{RenderedEmail, Template, TemplateError, TemplateResult};

/// Render a template's subject and body for one recipient.
///
/// Every `$token$` must have an entry in `template.values`; a missing entry
/// means extraction and resolution disagree and is reported as
/// [`TemplateError::Unresolved`]. Values are inserted literally and never
/// rescanned, so a value that itself looks like a marker leaves one behind;
/// that output is rejected with [`TemplateError::MarkerRemaining`].
pub fn render(template: &Template, salutation: &str) -> TemplateResult<RenderedEmail> {
    let subject = render_text(&template.id, &template.subject, &template.values, salutation)?;
    let body = render_text(&template.id, &template.body, &template.values, salutation)?;

    for (field, text) in [("subject", &subject), ("body", &body)] {
        if contains_marker(text) {
            return Err(TemplateError::MarkerRemaining {
                template: template.id.clone(),
                field,
            });
        }
    }

    Ok(RenderedEmail { subject, body })
}

/// Substitute tokens, then the salutation marker, in a single text
pub fn render_text(
    template_id: &str,
    text: &str,
    values: &BTreeMap<String, String>,
    salutation: &str,
) -> TemplateResult<String> {
    let substituted = substitute_tokens(template_id, text, values)?;
    Ok(substituted.replace(SALUTATION_MARKER, salutation))
}

/// Replace every `$token$` occurrence in one pass over `text`
pub fn substitute_tokens(
    template_id: &str,
    text: &str,
    values: &BTreeMap<String, String>,
) -> TemplateResult<String> {
    if let Some(missing) = PLACEHOLDER
        .captures_iter(text)
        .find(|caps| !values.contains_key(&caps[1]))
    {
        return Err(TemplateError::Unresolved {
            template: template_id.to_string(),
            token: missing[1].to_string(),
        });
    }

    let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        values
            .get(&caps[1])
            .map(String::as_str)
            .unwrap_or_default()
            .to_string()
    });

    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::contains_marker;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let result = substitute_tokens("t", "Hello, $Name$!", &values(&[("Name", "World")])).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_substitute_multiple_occurrences() {
        let result = substitute_tokens(
            "t",
            "Order $Id$ shipped; ref $Id$ via $Carrier$",
            &values(&[("Id", "ORD-123"), ("Carrier", "FedEx")]),
        )
        .unwrap();
        assert_eq!(result, "Order ORD-123 shipped; ref ORD-123 via FedEx");
    }

    #[test]
    fn test_substitute_is_case_sensitive() {
        let err = substitute_tokens("t", "$company$", &values(&[("Company", "Acme")])).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Unresolved { ref token, .. } if token == "company"
        ));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let result = substitute_tokens(
            "t",
            "$A$ and $B$",
            &values(&[("A", "$B$"), ("B", "bee")]),
        )
        .unwrap();
        assert_eq!(result, "$B$ and bee");
        // Single pass: the inserted marker survives and `render` must reject it
        assert!(contains_marker(&result));
    }

    #[test]
    fn test_render_rejects_marker_left_by_value() {
        let mut template = Template::new("intro", "Hi", "Hello #Salutation#, see $Position$");
        template.set_resolved("Position", "see $Note$".to_string());

        let err = render(&template, "Ms. Doe").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MarkerRemaining { ref template, field } if template == "intro" && field == "body"
        ));
    }

    #[test]
    fn test_render_rejects_marker_left_by_salutation() {
        let template = Template::new("intro", "For #Salutation#", "Body");

        let err = render(&template, "Dr $Who$").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MarkerRemaining { field, .. } if field == "subject"
        ));
    }

    #[test]
    fn test_empty_value_is_substituted() {
        let result = substitute_tokens("t", "[$Note$]", &values(&[("Note", "")])).unwrap();
        assert_eq!(result, "[]");
    }

    #[test]
    fn test_render_template_leaves_no_markers() {
        let mut template = Template::new(
            "intro",
            "$Position$ role at $Company$",
            "Dear #Salutation#,\n\nI'd love to join $Company$ as a $Position$.\n\n$Author$",
        );
        template.set_resolved("Position", "Engineer".to_string());
        template.set_resolved("Company", "Acme".to_string());
        template.set_resolved("Author", "Sam".to_string());

        let rendered = render(&template, "Ms. Doe").unwrap();

        assert_eq!(rendered.subject, "Engineer role at Acme");
        assert_eq!(
            rendered.body,
            "Dear Ms. Doe,\n\nI'd love to join Acme as a Engineer.\n\nSam"
        );
        assert!(!contains_marker(&rendered.subject));
        assert!(!contains_marker(&rendered.body));
    }

    #[test]
    fn test_render_reports_unresolved_token() {
        let template = Template::new("intro", "Hi", "About $Position$");
        let err = render(&template, "Mr. Smith").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Unresolved { ref template, ref token } if template == "intro" && token == "Position"
        ));
    }
}
