//! One full run: credentials check, report, delivery.

use chrono::{DateTime, Local};

use crate::{
    Config,
    aggregate::Aggregator,
    model::{Report, Zone},
    notify::{Notifier, TelegramNotifier},
    progress::ProgressObserver,
    render::render,
    report::{HORIZON_DAYS, build_report},
};

#[derive(Debug)]
pub struct RunSummary {
    pub report: Report,
    pub text: String,
    /// `None` on a dry run.
    pub delivered: Option<bool>,
}

/// The notifier for this run, or `None` on a dry run.
///
/// Fails when delivery credentials are missing.
pub fn notifier_from_config(
    config: &Config,
    dry_run: bool,
) -> anyhow::Result<Option<Box<dyn Notifier>>> {
    if dry_run {
        return Ok(None);
    }
    let credentials = config.delivery()?;
    Ok(Some(Box::new(TelegramNotifier::new(credentials)?)))
}

/// Check credentials, then build and deliver the report.
///
/// Missing credentials abort before any provider is queried.
pub async fn run(
    config: &Config,
    dry_run: bool,
    aggregator: &Aggregator,
    zones: &[Zone],
    generated_at: DateTime<Local>,
    observer: &dyn ProgressObserver,
) -> anyhow::Result<RunSummary> {
    let notifier = notifier_from_config(config, dry_run)?;
    Ok(run_with(aggregator, zones, notifier.as_deref(), generated_at, observer).await)
}

/// Build, render and deliver. A failed delivery is logged, never returned.
pub async fn run_with(
    aggregator: &Aggregator,
    zones: &[Zone],
    notifier: Option<&dyn Notifier>,
    generated_at: DateTime<Local>,
    observer: &dyn ProgressObserver,
) -> RunSummary {
    tracing::info!(zones = zones.len(), days = HORIZON_DAYS, "generating report");
    let report = build_report(aggregator, zones, generated_at, HORIZON_DAYS, observer).await;
    let text = render(&report);

    let delivered = match notifier {
        None => None,
        Some(notifier) => match notifier.notify(&text).await {
            Ok(()) => Some(true),
            Err(err) => {
                tracing::error!(error = %err, "report was not delivered");
                Some(false)
            }
        },
    };

    RunSummary { report, text, delivered }
}
