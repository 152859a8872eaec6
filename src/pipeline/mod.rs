//! Run orchestration.
//!
//! Control flow for one run:
//!
//! 1. Load and register every template file (a bad file aborts only itself)
//! 2. For each template, resolve its tokens once
//! 3. For each target: salutation, render, company lookup and address, delivery
//!
//! Target failures are caught at the target boundary and recorded in the
//! [`RunSummary`] with the stage they failed in.

mod mailer;
mod report;
mod target;

pub use mailer::{Mailer, ResolvedAddress};
pub use report::{RunSummary, TargetOutcome, TargetReport, TemplateFailure, TemplateStage};
pub use target::{parse_target, Addressing, Stage, Target, TargetError};
