//! Side channel for run progress, kept apart from the aggregation results.

use crate::{
    model::Zone,
    provider::{ProviderId, ProviderOutcome},
};

pub trait ProgressObserver: Send + Sync {
    fn run_started(&self, _zones: usize, _days: usize, _providers: usize) {}

    /// `position` is 1-based.
    fn zone_started(&self, _position: usize, _total: usize, _zone: &Zone) {}

    fn provider_finished(
        &self,
        _zone: &Zone,
        _day_index: usize,
        _provider: ProviderId,
        _outcome: &ProviderOutcome,
    ) {
    }

    fn zone_day_skipped(&self, _zone: &Zone, _day_index: usize) {}

    fn run_finished(&self) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Forwards progress to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn run_started(&self, zones: usize, days: usize, providers: usize) {
        tracing::info!(zones, days, providers, "querying forecast providers sequentially");
    }

    fn zone_started(&self, position: usize, total: usize, zone: &Zone) {
        tracing::info!(zone = %zone.name, "[{position}/{total}] fetching");
    }

    fn provider_finished(
        &self,
        zone: &Zone,
        day_index: usize,
        provider: ProviderId,
        outcome: &ProviderOutcome,
    ) {
        match outcome {
            ProviderOutcome::Ok(record) => tracing::debug!(
                zone = %zone.name,
                day_index,
                %provider,
                wind_knots = record.wind_knots,
                temperature_c = record.temperature_c,
                "provider ok"
            ),
            ProviderOutcome::Failed(err) => tracing::warn!(
                zone = %zone.name,
                day_index,
                %provider,
                error = %err,
                "provider failed"
            ),
        }
    }

    fn zone_day_skipped(&self, zone: &Zone, day_index: usize) {
        tracing::warn!(
            zone = %zone.name,
            day_index,
            "no provider returned data; zone omitted for this day"
        );
    }

    fn run_finished(&self) {
        tracing::info!("all forecast queries completed");
    }
}
