//! Domain layer modules
//!
//! This module contains the mail resolution logic:
//! - `address`: Email address synthesis from company formats
//! - `company`: Company record stores and disambiguation
//! - `delivery`: Delivery collaborator interface
//! - `input`: Token resolution and interactive prompts
//! - `person`: Name parsing and salutations
//! - `template`: Mail templates, extraction and rendering

pub mod address;
pub mod company;
pub mod delivery;
pub mod input;
pub mod person;
pub mod template;
