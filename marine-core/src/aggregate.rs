use crate::{
    model::{AggregatedRecord, ProviderForecastRecord, Zone},
    progress::ProgressObserver,
    provider::{ForecastProvider, ProviderId, ProviderOutcome, forecast_day},
    units::mean,
};

/// Everything learned about one zone/day: per-provider outcomes plus the average, if any.
#[derive(Debug)]
pub struct Aggregation {
    pub outcomes: Vec<(ProviderId, ProviderOutcome)>,
    pub record: Option<AggregatedRecord>,
}

/// Queries every provider in turn and averages what comes back.
#[derive(Debug)]
pub struct Aggregator {
    providers: Vec<Box<dyn ForecastProvider>>,
}

impl Aggregator {
    pub fn new(providers: Vec<Box<dyn ForecastProvider>>) -> Self {
        Self { providers }
    }

    pub fn total_providers(&self) -> usize {
        self.providers.len()
    }

    /// Sequential: one provider request in flight at a time.
    pub async fn aggregate_detailed(
        &self,
        zone: &Zone,
        day_index: usize,
        observer: &dyn ProgressObserver,
    ) -> Aggregation {
        let mut outcomes = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let outcome = forecast_day(provider.as_ref(), zone, day_index).await;
            observer.provider_finished(zone, day_index, provider.id(), &outcome);
            outcomes.push((provider.id(), outcome));
        }

        let records: Vec<ProviderForecastRecord> =
            outcomes.iter().filter_map(|(_, outcome)| outcome.record().copied()).collect();
        let record = average(&records, self.total_providers());

        Aggregation { outcomes, record }
    }

    /// `None` when no provider produced a record.
    pub async fn aggregate(
        &self,
        zone: &Zone,
        day_index: usize,
        observer: &dyn ProgressObserver,
    ) -> Option<AggregatedRecord> {
        self.aggregate_detailed(zone, day_index, observer).await.record
    }
}

/// Unweighted mean of wind and temperature over the records that exist.
///
/// Wave height is dropped here on purpose; it never reaches the score.
pub fn average(
    records: &[ProviderForecastRecord],
    total_providers: usize,
) -> Option<AggregatedRecord> {
    if records.is_empty() || total_providers == 0 {
        return None;
    }

    let winds: Vec<f64> = records.iter().map(|r| r.wind_knots).collect();
    let temps: Vec<f64> = records.iter().map(|r| r.temperature_c).collect();

    Some(AggregatedRecord {
        wind_knots: mean(&winds)?,
        temperature_c: mean(&temps)?,
        confidence_pct: records.len() as f64 / total_providers as f64 * 100.0,
        sources: records.len(),
        total_providers,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{error::ProviderError, progress::NoProgress};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    /// In-memory provider: answers per zone name, fails for unknown zones.
    #[derive(Debug)]
    pub(crate) struct FakeProvider {
        pub id: ProviderId,
        pub winds: HashMap<String, Vec<f64>>,
        pub temperature_c: f64,
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeProvider {
        pub(crate) fn new(id: ProviderId, winds: &[(&str, Vec<f64>)]) -> Self {
            Self {
                id,
                winds: winds.iter().map(|(z, w)| (z.to_string(), w.clone())).collect(),
                temperature_c: 20.0,
                calls: Arc::default(),
            }
        }

        pub(crate) fn with_temperature(mut self, temperature_c: f64) -> Self {
            self.temperature_c = temperature_c;
            self
        }
    }

    #[async_trait]
    impl ForecastProvider for FakeProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Value, ProviderError> {
            let key = format!("{latitude},{longitude}");
            self.calls.lock().unwrap().push(key.clone());

            let zone = self
                .winds
                .keys()
                .find(|name| zone_key(name) == key)
                .ok_or(ProviderError::Status {
                    status: reqwest::StatusCode::NOT_FOUND,
                    body: key,
                })?;
            Ok(json!({ "winds": self.winds[zone], "temp": self.temperature_c }))
        }

        fn parse(
            &self,
            raw: &Value,
            day_index: usize,
        ) -> Result<ProviderForecastRecord, ProviderError> {
            let wind = raw["winds"]
                .get(day_index)
                .and_then(Value::as_f64)
                .ok_or(ProviderError::DayOutOfRange { day_index, available: 0 })?;
            Ok(ProviderForecastRecord {
                wind_knots: wind,
                temperature_c: raw["temp"].as_f64().unwrap_or_default(),
                wave_height_m: 1.5,
            })
        }
    }

    pub(crate) fn boxed(provider: FakeProvider) -> Box<dyn ForecastProvider> {
        Box::new(provider)
    }

    /// Deterministic fake coordinates derived from a zone name.
    pub(crate) fn zone_key(name: &str) -> String {
        let n = name.bytes().map(f64::from).sum::<f64>();
        format!("{n},{}", -n)
    }

    pub(crate) fn zone(name: &str) -> Zone {
        let n = name.bytes().map(f64::from).sum::<f64>();
        Zone::new(name, n, -n)
    }

    fn record(wind: f64, temp: f64) -> ProviderForecastRecord {
        ProviderForecastRecord { wind_knots: wind, temperature_c: temp, wave_height_m: 0.0 }
    }

    #[test]
    fn no_records_means_no_aggregate() {
        assert_eq!(average(&[], 3), None);
    }

    #[test]
    fn single_record_is_passed_through_exactly() {
        let agg = average(&[record(6.3, 17.2)], 3).unwrap();
        assert_eq!(agg.wind_knots, 6.3);
        assert_eq!(agg.temperature_c, 17.2);
        assert!((agg.confidence_pct - 33.333).abs() < 0.01);
        assert_eq!(agg.sources, 1);
    }

    #[test]
    fn full_agreement_is_full_confidence() {
        let agg = average(&[record(3.0, 20.0), record(6.0, 22.0), record(9.0, 24.0)], 3).unwrap();
        assert_eq!(agg.confidence_pct, 100.0);
        assert!((agg.wind_knots - 6.0).abs() < 1e-12);
        assert!((agg.temperature_c - 22.0).abs() < 1e-12);
        assert_eq!(agg.sources, 3);
    }

    #[tokio::test]
    async fn all_failures_yield_none_with_reasons() {
        let aggregator = Aggregator::new(vec![
            boxed(FakeProvider::new(ProviderId::OpenWeather, &[])),
            boxed(FakeProvider::new(ProviderId::WeatherApi, &[])),
            boxed(FakeProvider::new(ProviderId::OpenMeteo, &[])),
        ]);

        let result = aggregator.aggregate_detailed(&zone("Nowhere"), 0, &NoProgress).await;
        assert!(result.record.is_none());
        assert_eq!(result.outcomes.len(), 3);
        assert!(
            result
                .outcomes
                .iter()
                .all(|(_, o)| matches!(o, ProviderOutcome::Failed(ProviderError::Status { .. })))
        );
    }

    #[tokio::test]
    async fn partial_success_degrades_confidence() {
        let ow = FakeProvider::new(ProviderId::OpenWeather, &[("Sóller", vec![4.0])]);
        let om = FakeProvider::new(ProviderId::OpenMeteo, &[("Sóller", vec![8.0])]);
        let aggregator = Aggregator::new(vec![
            boxed(ow.with_temperature(18.0)),
            boxed(FakeProvider::new(ProviderId::WeatherApi, &[])),
            boxed(om.with_temperature(22.0)),
        ]);

        let agg = aggregator.aggregate(&zone("Sóller"), 0, &NoProgress).await.unwrap();
        assert_eq!(agg.sources, 2);
        assert!((agg.confidence_pct - 66.667).abs() < 0.01);
        assert_eq!(agg.wind_knots, 6.0);
        assert_eq!(agg.temperature_c, 20.0);
    }

    #[tokio::test]
    async fn providers_are_called_in_registration_order() {
        #[derive(Default)]
        struct Recorder(Mutex<Vec<ProviderId>>);

        impl ProgressObserver for Recorder {
            fn provider_finished(
                &self,
                _: &Zone,
                _: usize,
                provider: ProviderId,
                _: &ProviderOutcome,
            ) {
                self.0.lock().unwrap().push(provider);
            }
        }

        let aggregator = Aggregator::new(vec![
            boxed(FakeProvider::new(ProviderId::OpenWeather, &[("A", vec![1.0])])),
            boxed(FakeProvider::new(ProviderId::WeatherApi, &[("A", vec![1.0])])),
            boxed(FakeProvider::new(ProviderId::OpenMeteo, &[("A", vec![1.0])])),
        ]);
        let recorder = Recorder::default();
        aggregator.aggregate(&zone("A"), 0, &recorder).await;

        assert_eq!(*recorder.0.lock().unwrap(), ProviderId::all());
    }
}
