//! Metrics helper structs for convenient metric recording

use std::path::Path;

use prometheus::{Encoder, TextEncoder};

use super::{
    COMPANY_DISAMBIGUATIONS_TOTAL, EMAILS_RENDERED_TOTAL, EMAILS_SENT_TOTAL,
    TARGETS_FAILED_TOTAL, TEMPLATES_FAILED_TOTAL, TEMPLATES_LOADED_TOTAL,
    TOKENS_DEFAULTED_TOTAL, TOKENS_PROMPTED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Encode all metrics and write them to `path`
pub fn write_metrics(path: &Path) -> Result<(), crate::error::AppError> {
    let text = encode_metrics()?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Helper struct for recording template metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    /// Record a successfully loaded template
    pub fn record_loaded() {
        TEMPLATES_LOADED_TOTAL.inc();
    }

    /// Record a template aborted at the given stage ("load" or "resolve")
    pub fn record_failed(stage: &str) {
        TEMPLATES_FAILED_TOTAL.with_label_values(&[stage]).inc();
    }

    /// Record a token filled from the prompt
    pub fn record_prompted() {
        TOKENS_PROMPTED_TOTAL.inc();
    }

    /// Record a token filled from the defaults table
    pub fn record_defaulted() {
        TOKENS_DEFAULTED_TOTAL.inc();
    }
}

/// Helper struct for recording per-target mail metrics
pub struct MailMetrics;

impl MailMetrics {
    pub fn record_rendered() {
        EMAILS_RENDERED_TOTAL.inc();
    }

    pub fn record_sent() {
        EMAILS_SENT_TOTAL.inc();
    }

    /// Record a target failure at the given pipeline stage
    pub fn record_failed(stage: &str) {
        TARGETS_FAILED_TOTAL.with_label_values(&[stage]).inc();
    }

    /// Record an ambiguous company lookup settled by `strategy`
    pub fn record_disambiguation(strategy: &str) {
        COMPANY_DISAMBIGUATIONS_TOTAL
            .with_label_values(&[strategy])
            .inc();
    }
}
