//! Delivery collaborator interface.
//!
//! The mailer never talks to a transport directly. It hands each rendered
//! message to a [`Delivery`] implementation, which reports success or failure
//! per send.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::template::RenderedEmail;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery to {to} failed: {reason}")]
    Failure { to: String, reason: String },
}

/// A fully rendered message ready to send
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

impl OutboundEmail {
    /// Assemble an outbound message, resolving attachment names against `attachments_dir`
    pub fn new(
        from: &str,
        to: String,
        rendered: RenderedEmail,
        attachments: &[String],
        attachments_dir: &Path,
    ) -> Self {
        Self {
            from: from.to_string(),
            to,
            subject: rendered.subject,
            body: rendered.body,
            attachments: attachments
                .iter()
                .map(|name| attachments_dir.join(name))
                .collect(),
        }
    }
}

#[async_trait]
pub trait Delivery: Send + Sync {
    /// Backend type identifier
    fn name(&self) -> &'static str;

    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError>;
}

/// Logs every message instead of sending it.
#[derive(Debug, Default)]
pub struct DryRunDelivery {
    sent: AtomicU64,
}

impl DryRunDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Delivery for DryRunDelivery {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), DeliveryError> {
        self.sent.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "Dry run: message not sent"
        );
        tracing::debug!(to = %email.to, body = %email.body, "Dry run message body");
        Ok(())
    }
}
