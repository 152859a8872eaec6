//! Per-target and per-template outcome reporting

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::target::Stage;

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TargetOutcome {
    Sent { to: String },
    Failed { stage: Stage, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub template: String,
    pub target: String,
    pub outcome: TargetOutcome,
    /// "<strategy> chose <company> of <n> matches" when a company lookup was ambiguous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
}

impl TargetReport {
    pub fn is_sent(&self) -> bool {
        matches!(self.outcome, TargetOutcome::Sent { .. })
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match &self.outcome {
            TargetOutcome::Failed { stage, .. } => Some(*stage),
            TargetOutcome::Sent { .. } => None,
        }
    }
}

/// Template-level stage a template was aborted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStage {
    Load,
    Resolve,
}

impl TemplateStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStage::Load => "load",
            TemplateStage::Resolve => "resolve",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateFailure {
    pub template: String,
    pub stage: TemplateStage,
    pub error: String,
}

/// Everything that happened during one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub templates_processed: usize,
    pub template_failures: Vec<TemplateFailure>,
    pub targets: Vec<TargetReport>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            templates_processed: 0,
            template_failures: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.targets.iter().filter(|r| r.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.targets.len() - self.sent_count()
    }

    /// No template or target failed
    pub fn is_clean(&self) -> bool {
        self.template_failures.is_empty() && self.failed_count() == 0
    }

    /// Reports for one template, in processing order
    pub fn reports_for<'a>(&'a self, template: &'a str) -> impl Iterator<Item = &'a TargetReport> + 'a {
        self.targets.iter().filter(move |r| r.template == template)
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(template: &str, outcome: TargetOutcome) -> TargetReport {
        TargetReport {
            template: template.to_string(),
            target: "Jane Doe".to_string(),
            outcome,
            disambiguation: None,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new();
        assert!(summary.is_clean());

        summary.targets.push(report(
            "intro",
            TargetOutcome::Sent {
                to: "jdoe@acme.com".to_string(),
            },
        ));
        summary.targets.push(report(
            "followup",
            TargetOutcome::Failed {
                stage: Stage::Company,
                error: "Company 'Acme' not found".to_string(),
            },
        ));

        assert_eq!(summary.sent_count(), 1);
        assert_eq!(summary.failed_count(), 1);
        assert!(!summary.is_clean());
        assert_eq!(summary.reports_for("followup").count(), 1);
        assert_eq!(
            summary.targets[1].failed_stage(),
            Some(Stage::Company)
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let value = serde_json::to_value(TargetOutcome::Failed {
            stage: Stage::Address,
            error: "boom".to_string(),
        })
        .unwrap();

        assert_eq!(value["status"], "failed");
        assert_eq!(value["stage"], "address");
    }
}
