//! Prometheus metrics for a mailer run.
//!
//! The mailer is a batch process, so nothing scrapes these directly. When
//! `mailer.metrics_path` is set the text exposition is written to that file at
//! the end of the run (suitable for a node-exporter textfile collector).

mod helpers;

pub use helpers::{encode_metrics, write_metrics, MailMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "recruit_mailer";

lazy_static! {
    // ============================================================================
    // Template Metrics
    // ============================================================================

    /// Templates parsed and registered successfully
    pub static ref TEMPLATES_LOADED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_templates_loaded_total", METRIC_PREFIX),
        "Total templates loaded"
    ).unwrap();

    /// Templates that failed to load or resolve
    pub static ref TEMPLATES_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_templates_failed_total", METRIC_PREFIX),
        "Total templates aborted, by stage",
        &["stage"]
    ).unwrap();

    /// Token values obtained from the interactive prompt
    pub static ref TOKENS_PROMPTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_tokens_prompted_total", METRIC_PREFIX),
        "Total token values read from the interactive prompt"
    ).unwrap();

    /// Token values filled from the defaults table
    pub static ref TOKENS_DEFAULTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_tokens_defaulted_total", METRIC_PREFIX),
        "Total token values filled from configured defaults"
    ).unwrap();

    // ============================================================================
    // Mail Metrics
    // ============================================================================

    /// Emails rendered with no remaining placeholders
    pub static ref EMAILS_RENDERED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_rendered_total", METRIC_PREFIX),
        "Total emails rendered"
    ).unwrap();

    /// Emails accepted by the delivery collaborator
    pub static ref EMAILS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_emails_sent_total", METRIC_PREFIX),
        "Total emails handed off successfully"
    ).unwrap();

    /// Targets that failed, by pipeline stage
    pub static ref TARGETS_FAILED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_targets_failed_total", METRIC_PREFIX),
        "Total targets that failed, by stage",
        &["stage"]
    ).unwrap();

    /// Company lookups that needed disambiguation, by strategy
    pub static ref COMPANY_DISAMBIGUATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_company_disambiguations_total", METRIC_PREFIX),
        "Total ambiguous company lookups, by strategy",
        &["strategy"]
    ).unwrap();
}
