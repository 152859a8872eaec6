use std::sync::Arc;

use anyhow::Result;
use tracing::Instrument;

use recruit_mailer::company::create_company_store;
use recruit_mailer::config::Settings;
use recruit_mailer::delivery::DryRunDelivery;
use recruit_mailer::input::TerminalPrompt;
use recruit_mailer::metrics::write_metrics;
use recruit_mailer::pipeline::{Mailer, RunSummary};
use recruit_mailer::telemetry::{init_tracing, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing(LogFormat::from_env());

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!("Configuration loaded");

    // Store failures are fatal: nothing is sent without reference data
    let store = create_company_store(&settings.store).await?;
    tracing::info!(backend = store.backend_name(), "Company store ready");

    let mailer = Mailer::from_settings(
        &settings,
        store.clone(),
        Arc::new(TerminalPrompt::new()),
        Arc::new(DryRunDelivery::new()),
    )?;

    let mut summary = RunSummary::new();
    let span = tracing::info_span!("run", run_id = %summary.run_id);

    let outcome = async {
        mailer.load_templates(&settings.mailer.templates_dir, &mut summary)?;
        mailer.run(&mut summary).await;
        Ok::<_, anyhow::Error>(())
    }
    .instrument(span)
    .await;

    store.close().await;
    outcome?;

    for failure in &summary.template_failures {
        tracing::warn!(
            template = %failure.template,
            stage = failure.stage.as_str(),
            error = %failure.error,
            "Template aborted"
        );
    }
    tracing::debug!(summary = %serde_json::to_string(&summary)?, "Run summary");

    if let Some(path) = &settings.mailer.metrics_path {
        write_metrics(path)?;
        tracing::info!(path = %path.display(), "Metrics written");
    }

    if !summary.is_clean() {
        tracing::warn!(
            failed_targets = summary.failed_count(),
            failed_templates = summary.template_failures.len(),
            "Run finished with failures"
        );
    }

    Ok(())
}
