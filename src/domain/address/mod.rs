//! Email address synthesis from a company's address-format pattern.
//!
//! Patterns are matched case-insensitively and may use `firstname`,
//! `lastname`, `firstinitial` and `lastinitial` any number of times. Anything
//! else in the pattern is copied literally: `FirstInitialLastName` for
//! Jane Doe at acme.com gives `jdoe@acme.com`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::company::CompanyRecord;
use crate::person::NameParts;

lazy_static! {
    static ref FORMAT_TOKEN: Regex =
        Regex::new(r"firstinitial|lastinitial|firstname|lastname").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Cannot format address: {0} name is empty")]
    EmptyNamePart(&'static str),

    #[error("Cannot format address: no company record was resolved")]
    NoCompanyMatch,
}

/// Substitute name parts into `pattern`, keeping the case of the name parts.
///
/// The pattern itself is lower-cased first; replacement is a single pass, so
/// a name that happens to contain a token word is not substituted again.
pub fn substitute_local_part(pattern: &str, parts: &NameParts) -> Result<String, AddressError> {
    let first = parts.first_name.trim();
    let last = parts.last_name.trim();

    let first_initial = first
        .chars()
        .next()
        .ok_or(AddressError::EmptyNamePart("first"))?;
    let last_initial = last
        .chars()
        .next()
        .ok_or(AddressError::EmptyNamePart("last"))?;

    let lower = pattern.to_lowercase();
    let local = FORMAT_TOKEN.replace_all(&lower, |caps: &Captures| match &caps[0] {
        "firstname" => first.to_string(),
        "lastname" => last.to_string(),
        "firstinitial" => first_initial.to_string(),
        _ => last_initial.to_string(),
    });

    Ok(local.trim().to_string())
}

/// Build a lower-cased delivery address: `local@domain`.
pub fn format_address(pattern: &str, parts: &NameParts, domain: &str) -> Result<String, AddressError> {
    let local = substitute_local_part(pattern, parts)?;
    Ok(format!("{}@{}", local, domain.trim()).to_lowercase())
}

/// [`format_address`] using a resolved company record's pattern and domain.
pub fn format_for_record(
    record: Option<&CompanyRecord>,
    parts: &NameParts,
) -> Result<String, AddressError> {
    let record = record.ok_or(AddressError::NoCompanyMatch)?;
    format_address(&record.address_format, parts, &record.domain)
}
