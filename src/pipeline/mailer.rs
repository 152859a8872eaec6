use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::address::{format_address, AddressError};
use crate::company::{create_strategy, CompanyFormatResolver, CompanyStore, Resolution};
use crate::config::Settings;
use crate::delivery::{Delivery, OutboundEmail};
use crate::error::AppError;
use crate::input::{InputError, InputResolver, Prompt, ResolveStats};
use crate::metrics::{MailMetrics, TemplateMetrics};
use crate::person::{split_name, SalutationPolicy};
use crate::template::{
    load_dir, render, LoadedTemplate, RenderedEmail, Template, TemplateResult, TemplateStore,
};

use super::report::{
    RunSummary, TargetOutcome, TargetReport, TemplateFailure, TemplateStage,
};
use super::target::{parse_target, Addressing, Target, TargetError};

/// Template value names consulted for targets without their own company
const TEMPLATE_COMPANY_TOKENS: [&str; 2] = ["company", "companyname"];

/// Destination address for one target, with the company resolution behind it
#[derive(Debug, Clone)]
pub struct ResolvedAddress {
    pub address: String,
    pub resolution: Option<Resolution>,
}

/// Orchestrates one run: owns the template registry and every collaborator,
/// and processes templates and their targets sequentially.
pub struct Mailer {
    sender: String,
    attachments_dir: PathBuf,
    templates: TemplateStore,
    inputs: InputResolver,
    companies: CompanyFormatResolver,
    salutations: SalutationPolicy,
    delivery: Arc<dyn Delivery>,
    /// Attachment name appended to every message, when set
    resume: Option<String>,
}

impl Mailer {
    pub fn new(
        sender: impl Into<String>,
        attachments_dir: impl Into<PathBuf>,
        inputs: InputResolver,
        companies: CompanyFormatResolver,
        salutations: SalutationPolicy,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        Self {
            sender: sender.into(),
            attachments_dir: attachments_dir.into(),
            templates: TemplateStore::new(),
            inputs,
            companies,
            salutations,
            delivery,
            resume: None,
        }
    }

    /// Attach `name` (relative to the attachments directory) to every message
    pub fn with_resume(mut self, name: impl Into<String>) -> Self {
        self.resume = Some(name.into());
        self
    }

    /// Wire a mailer from settings and already-connected collaborators
    pub fn from_settings(
        settings: &Settings,
        store: Arc<dyn CompanyStore>,
        prompt: Arc<dyn Prompt>,
        delivery: Arc<dyn Delivery>,
    ) -> Result<Self, AppError> {
        let strategy = create_strategy(&settings.company.disambiguation, prompt.clone())
            .ok_or_else(|| {
                AppError::InvalidSetting(format!(
                    "company.disambiguation: unknown strategy '{}'",
                    settings.company.disambiguation
                ))
            })?;

        tracing::info!(
            store = store.backend_name(),
            delivery = delivery.name(),
            disambiguation = strategy.name(),
            "Mailer initialized"
        );

        let mailer = Self::new(
            settings.mailer.sender.clone(),
            settings.mailer.attachments_dir.clone(),
            InputResolver::new(settings.defaults.clone(), prompt),
            CompanyFormatResolver::with_strategy(store, strategy),
            SalutationPolicy::new(
                settings.salutation.fallback,
                settings.salutation.default.clone(),
            ),
            delivery,
        );

        Ok(match settings.mailer.resume_attachment() {
            Some(resume) => mailer.with_resume(resume),
            None => mailer,
        })
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Register a template for this run
    pub fn add_template(&self, template: Template) -> TemplateResult<()> {
        self.templates.create(template)?;
        TemplateMetrics::record_loaded();
        Ok(())
    }

    /// Register a loaded template file, recording a failure if it did not parse
    pub fn register(&self, loaded: LoadedTemplate, summary: &mut RunSummary) {
        let registered = loaded.result.and_then(|template| self.add_template(template));

        if let Err(e) = registered {
            tracing::error!(
                template = %loaded.id,
                path = %loaded.path.display(),
                error = %e,
                "Failed to load template"
            );
            TemplateMetrics::record_failed(TemplateStage::Load.as_str());
            summary.template_failures.push(TemplateFailure {
                template: loaded.id,
                stage: TemplateStage::Load,
                error: e.to_string(),
            });
        }
    }

    /// Load every template file in `dir`. Only an unreadable directory is an error.
    pub fn load_templates(&self, dir: &Path, summary: &mut RunSummary) -> Result<(), AppError> {
        for loaded in load_dir(dir)? {
            self.register(loaded, summary);
        }

        tracing::info!(
            dir = %dir.display(),
            loaded = self.templates.count(),
            failed = summary.template_failures.len(),
            "Templates loaded"
        );
        Ok(())
    }

    /// Fill every token of `template` (template value, defaults, prompt)
    pub fn resolve_template(&self, template: &mut Template) -> Result<ResolveStats, InputError> {
        self.inputs.resolve(template)
    }

    /// Salutation and rendered subject/body for one target
    pub fn render_target(
        &self,
        template: &Template,
        target: &Target,
    ) -> Result<RenderedEmail, TargetError> {
        let salutation = self
            .salutations
            .salutation_for(&target.name)
            .map_err(TargetError::Salutation)?;

        let rendered = render(template, &salutation)?;
        MailMetrics::record_rendered();
        Ok(rendered)
    }

    /// Destination address for one target
    pub async fn address_target(
        &self,
        template: &Template,
        target: &Target,
    ) -> Result<ResolvedAddress, TargetError> {
        let company = match &target.addressing {
            Addressing::Explicit(address) => {
                return Ok(ResolvedAddress {
                    address: address.clone(),
                    resolution: None,
                })
            }
            Addressing::Company(company) => company.as_str(),
            Addressing::TemplateCompany => TEMPLATE_COMPANY_TOKENS
                .iter()
                .find_map(|token| template.value_ignore_case(token))
                .ok_or(AddressError::NoCompanyMatch)?,
        };

        let parts = split_name(&target.name).map_err(TargetError::AddressName)?;
        let resolution = self.companies.resolve_one(company).await?;
        let address = format_address(
            &resolution.record.address_format,
            &parts,
            &resolution.record.domain,
        )?;

        Ok(ResolvedAddress {
            address,
            resolution: Some(resolution),
        })
    }

    /// Run the full per-target pipeline. Failures are reported, never propagated.
    #[tracing::instrument(
        name = "mailer.process_target",
        skip(self, template),
        fields(template = %template.id)
    )]
    pub async fn process_target(&self, template: &Template, raw_target: &str) -> TargetReport {
        let mut disambiguation = None;
        let outcome = match self
            .deliver_target(template, raw_target, &mut disambiguation)
            .await
        {
            Ok(to) => {
                MailMetrics::record_sent();
                tracing::info!(recipient = %raw_target, to = %to, "Message handed off");
                TargetOutcome::Sent { to }
            }
            Err(e) => {
                let stage = e.stage();
                MailMetrics::record_failed(stage.as_str());
                tracing::error!(
                    recipient = %raw_target,
                    stage = %stage,
                    error = %e,
                    "Target failed"
                );
                TargetOutcome::Failed {
                    stage,
                    error: e.to_string(),
                }
            }
        };

        TargetReport {
            template: template.id.clone(),
            target: raw_target.to_string(),
            outcome,
            disambiguation,
        }
    }

    async fn deliver_target(
        &self,
        template: &Template,
        raw_target: &str,
        disambiguation: &mut Option<String>,
    ) -> Result<String, TargetError> {
        let target = parse_target(raw_target)?;
        let rendered = self.render_target(template, &target)?;
        let resolved = self.address_target(template, &target).await?;

        if let Some(resolution) = resolved.resolution.as_ref().filter(|r| r.was_ambiguous()) {
            *disambiguation = Some(format!(
                "{} chose '{}' of {} matches",
                resolution.strategy.unwrap_or("none"),
                resolution.record.company,
                resolution.candidates
            ));
        }

        let email = OutboundEmail::new(
            &self.sender,
            resolved.address,
            rendered,
            &self.attachments_for(template),
            &self.attachments_dir,
        );
        self.delivery.send(&email).await?;

        Ok(email.to)
    }

    /// Template attachments plus the résumé, listed once
    fn attachments_for(&self, template: &Template) -> Vec<String> {
        let mut attachments = template.attachments.clone();
        if let Some(resume) = &self.resume {
            if !attachments.contains(resume) {
                attachments.push(resume.clone());
            }
        }
        attachments
    }

    /// Resolve a registered template once, then process each of its targets.
    ///
    /// A resolution failure aborts this template only. The template is
    /// dropped from the registry once its targets are done.
    #[tracing::instrument(name = "mailer.process_template", skip(self, summary))]
    pub async fn process_template(&self, id: &str, summary: &mut RunSummary) {
        let mut template = match self.templates.get(id) {
            Ok(template) => template,
            Err(e) => {
                tracing::error!(error = %e, "Template disappeared from registry");
                return;
            }
        };

        match self.resolve_template(&mut template) {
            Ok(stats) => {
                tracing::debug!(
                    kept = stats.kept,
                    defaulted = stats.defaulted,
                    prompted = stats.prompted,
                    "Template tokens resolved"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve template tokens");
                TemplateMetrics::record_failed(TemplateStage::Resolve.as_str());
                summary.template_failures.push(TemplateFailure {
                    template: id.to_string(),
                    stage: TemplateStage::Resolve,
                    error: e.to_string(),
                });
                self.unregister(id);
                return;
            }
        }

        if let Err(e) = self.templates.replace(template.clone()) {
            tracing::warn!(error = %e, "Could not store resolved template");
        }

        for raw_target in &template.targets {
            let report = self.process_target(&template, raw_target).await;
            summary.targets.push(report);
        }

        summary.templates_processed += 1;
        self.unregister(id);
    }

    fn unregister(&self, id: &str) {
        if let Err(e) = self.templates.remove(id) {
            tracing::warn!(template = %id, error = %e, "Could not remove template from registry");
        }
    }

    /// Process every registered template in ID order
    pub async fn run(&self, summary: &mut RunSummary) {
        for id in self.templates.ids() {
            self.process_template(&id, summary).await;
        }
        summary.finish();

        tracing::info!(
            run_id = %summary.run_id,
            templates = summary.templates_processed,
            template_failures = summary.template_failures.len(),
            sent = summary.sent_count(),
            failed = summary.failed_count(),
            "Run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{CompanyRecord, MemoryCompanyStore};
    use crate::delivery::DryRunDelivery;
    use crate::input::{CannedPrompt, DefaultsTable};
    use crate::person::FallbackTitle;
    use crate::pipeline::Stage;

    fn mailer(records: Vec<CompanyRecord>, prompt: Arc<CannedPrompt>) -> Mailer {
        let store: Arc<dyn CompanyStore> = Arc::new(MemoryCompanyStore::new(records));
        Mailer::new(
            "me@example.com",
            "attachments",
            InputResolver::new(DefaultsTable::new("Sam Carter", "Acme"), prompt),
            CompanyFormatResolver::new(store),
            SalutationPolicy::new(FallbackTitle::Female, None),
            Arc::new(DryRunDelivery::new()),
        )
    }

    #[test]
    fn test_render_target_uses_template_values() {
        let mailer = mailer(vec![], Arc::new(CannedPrompt::default()));
        let mut template = Template::new("intro", "Hi", "Hello #Salutation#, welcome to $Company$");
        mailer.resolve_template(&mut template).unwrap();

        let target = parse_target("Jane Doe").unwrap();
        let rendered = mailer.render_target(&template, &target).unwrap();
        assert_eq!(rendered.body, "Hello Ms. Doe, welcome to Acme");
    }

    #[tokio::test]
    async fn test_address_target_explicit() {
        let mailer = mailer(vec![], Arc::new(CannedPrompt::default()));
        let template = Template::new("intro", "Hi", "Body");
        let target = parse_target("Cher <cher@example.com>").unwrap();

        let resolved = mailer.address_target(&template, &target).await.unwrap();
        assert_eq!(resolved.address, "cher@example.com");
        assert!(resolved.resolution.is_none());
    }

    #[tokio::test]
    async fn test_address_target_from_template_company() {
        let mailer = mailer(
            vec![CompanyRecord::new("Initech", "firstinitiallastname", "initech.com")],
            Arc::new(CannedPrompt::default()),
        );
        let template = Template::new("intro", "Hi", "$CompanyName$").with_value("CompanyName", "initech");
        let target = parse_target("Peter Gibbons").unwrap();

        let resolved = mailer.address_target(&template, &target).await.unwrap();
        assert_eq!(resolved.address, "pgibbons@initech.com");
    }

    #[tokio::test]
    async fn test_address_target_without_company() {
        let mailer = mailer(vec![], Arc::new(CannedPrompt::default()));
        let template = Template::new("intro", "Hi", "Body");
        let target = parse_target("Jane Doe").unwrap();

        let err = mailer.address_target(&template, &target).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Address);
    }

    #[tokio::test]
    async fn test_process_target_rejects_leftover_marker() {
        let prompt = Arc::new(CannedPrompt::new(["see $Note$"]));
        let mailer = mailer(vec![], prompt);
        let mut template = Template::new("intro", "Hi", "Hello #Salutation#, $Position$");
        mailer.resolve_template(&mut template).unwrap();

        let report = mailer
            .process_target(&template, "Dr $Who$ Smith <a@b.example>")
            .await;
        assert_eq!(report.failed_stage(), Some(Stage::Render));
    }

    #[test]
    fn test_attachments_include_resume_once() {
        let template = Template::new("intro", "Hi", "Body").with_attachments(["resume.pdf", "cover.pdf"]);

        let plain = mailer(vec![], Arc::new(CannedPrompt::default()));
        assert_eq!(plain.attachments_for(&template), vec!["resume.pdf", "cover.pdf"]);

        let with_resume = mailer(vec![], Arc::new(CannedPrompt::default())).with_resume("resume.pdf");
        assert_eq!(with_resume.attachments_for(&template), vec!["resume.pdf", "cover.pdf"]);

        let other = Template::new("other", "Hi", "Body");
        assert_eq!(with_resume.attachments_for(&other), vec!["resume.pdf"]);
    }

    #[tokio::test]
    async fn test_process_target_reports_stage() {
        let mailer = mailer(vec![], Arc::new(CannedPrompt::default()));
        let template = Template::new("intro", "Hi", "Hello #Salutation#");

        let report = mailer.process_target(&template, "Madonna @ Acme").await;
        assert_eq!(report.failed_stage(), Some(Stage::Salutation));

        let report = mailer.process_target(&template, "Jane Doe @ Globex").await;
        assert_eq!(report.failed_stage(), Some(Stage::Company));

        let report = mailer.process_target(&template, "Jane Doe <jane@doe.net>").await;
        assert!(report.is_sent());
    }
}
