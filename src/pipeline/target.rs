//! Delivery target identifiers

use serde::Serialize;
use thiserror::Error;

use crate::address::AddressError;
use crate::company::CompanyError;
use crate::delivery::DeliveryError;
use crate::person::NameError;
use crate::template::TemplateError;

/// How a target's destination address is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// `Full Name <addr@host>`
    Explicit(String),
    /// `Full Name @ Company`
    Company(String),
    /// `Full Name`: company taken from the template's `company`/`companyname` value
    TemplateCompany,
}

/// A parsed template target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub raw: String,
    pub name: String,
    pub addressing: Addressing,
}

/// Parse a target identifier.
///
/// ```text
/// Jane Doe <jane@acme.com>   explicit address
/// Jane Doe @ Acme            company-based address
/// Jane Doe                   company from the template
/// ```
pub fn parse_target(raw: &str) -> Result<Target, TargetError> {
    let trimmed = raw.trim();
    let invalid = || TargetError::InvalidTarget(raw.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Some(stripped) = trimmed.strip_suffix('>') {
        let (name, address) = stripped.split_once('<').ok_or_else(invalid)?;
        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || !address.contains('@') {
            return Err(invalid());
        }
        return Ok(Target {
            raw: raw.to_string(),
            name: name.to_string(),
            addressing: Addressing::Explicit(address.to_string()),
        });
    }

    if let Some((name, company)) = trimmed.split_once(" @ ") {
        let (name, company) = (name.trim(), company.trim());
        if name.is_empty() || company.is_empty() {
            return Err(invalid());
        }
        return Ok(Target {
            raw: raw.to_string(),
            name: name.to_string(),
            addressing: Addressing::Company(company.to_string()),
        });
    }

    if trimmed.contains(['@', '<', '>']) {
        return Err(invalid());
    }

    Ok(Target {
        raw: raw.to_string(),
        name: trimmed.to_string(),
        addressing: Addressing::TemplateCompany,
    })
}

/// Pipeline stage a target failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Target,
    Salutation,
    Render,
    Company,
    Address,
    Delivery,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Target => "target",
            Stage::Salutation => "salutation",
            Stage::Render => "render",
            Stage::Company => "company",
            Stage::Address => "address",
            Stage::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure processing a single target
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Invalid target identifier: {0:?}")]
    InvalidTarget(String),

    #[error("Cannot build salutation: {0}")]
    Salutation(#[source] NameError),

    #[error(transparent)]
    Render(#[from] TemplateError),

    #[error(transparent)]
    Company(#[from] CompanyError),

    #[error("Cannot build address: {0}")]
    AddressName(#[source] NameError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl TargetError {
    pub fn stage(&self) -> Stage {
        match self {
            TargetError::InvalidTarget(_) => Stage::Target,
            TargetError::Salutation(_) => Stage::Salutation,
            TargetError::Render(_) => Stage::Render,
            TargetError::Company(_) => Stage::Company,
            TargetError::AddressName(_) | TargetError::Address(_) => Stage::Address,
            TargetError::Delivery(_) => Stage::Delivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_address() {
        let target = parse_target("Dr John Smith <jsmith@example.com>").unwrap();
        assert_eq!(target.name, "Dr John Smith");
        assert_eq!(
            target.addressing,
            Addressing::Explicit("jsmith@example.com".to_string())
        );
    }

    #[test]
    fn test_parse_company_address() {
        let target = parse_target(" Jane Doe @ Acme Corp ").unwrap();
        assert_eq!(target.name, "Jane Doe");
        assert_eq!(target.addressing, Addressing::Company("Acme Corp".to_string()));
        assert_eq!(target.raw, " Jane Doe @ Acme Corp ");
    }

    #[test]
    fn test_parse_plain_name() {
        let target = parse_target("Jane Doe").unwrap();
        assert_eq!(target.addressing, Addressing::TemplateCompany);
    }

    #[test]
    fn test_parse_invalid_targets() {
        for raw in ["", "   ", "<jane@acme.com>", "Jane <not-an-address>", "Jane @ ", "Jane Doe>"] {
            assert!(
                matches!(parse_target(raw), Err(TargetError::InvalidTarget(_))),
                "expected {:?} to be invalid",
                raw
            );
        }
    }

    #[test]
    fn test_error_stages() {
        assert_eq!(
            TargetError::Salutation(NameError::MalformedName("x".into())).stage(),
            Stage::Salutation
        );
        assert_eq!(
            TargetError::from(AddressError::NoCompanyMatch).stage(),
            Stage::Address
        );
        assert_eq!(
            TargetError::from(CompanyError::NotFound("Acme".into())).stage(),
            Stage::Company
        );
        assert_eq!(Stage::Delivery.to_string(), "delivery");
    }
}
