use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::ProviderError,
    model::ProviderForecastRecord,
    provider::{ProviderId, get_json, http_client},
    units::{mean, ms_to_knots},
};

use super::ForecastProvider;

const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const TIMEOUT: Duration = Duration::from_secs(15);
/// The 5-day forecast comes in 3-hour steps.
const ENTRIES_PER_DAY: usize = 8;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        Ok(Self { api_key, http: http_client(TIMEOUT)? })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    main: OwMain,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Value, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        get_json(
            &self.http,
            FORECAST_URL,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ],
        )
        .await
    }

    /// Averages the eight 3-hour buckets of the requested day.
    fn parse(
        &self,
        raw: &Value,
        day_index: usize,
    ) -> Result<ProviderForecastRecord, ProviderError> {
        let parsed = OwForecastResponse::deserialize(raw).map_err(ProviderError::Schema)?;

        let start = day_index * ENTRIES_PER_DAY;
        let end = start + ENTRIES_PER_DAY;
        let day = parsed.list.get(start..end).ok_or(ProviderError::DayOutOfRange {
            day_index,
            available: parsed.list.len() / ENTRIES_PER_DAY,
        })?;

        let winds: Vec<f64> = day.iter().map(|e| e.wind.speed).collect();
        let temps: Vec<f64> = day.iter().map(|e| e.main.temp).collect();

        let wind_ms = mean(&winds).ok_or(ProviderError::EmptyDay { day_index })?;
        let temperature_c = mean(&temps).ok_or(ProviderError::EmptyDay { day_index })?;

        Ok(ProviderForecastRecord {
            wind_knots: ms_to_knots(wind_ms),
            temperature_c,
            wave_height_m: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast(entries: usize, speed: impl Fn(usize) -> f64) -> Value {
        let list: Vec<Value> = (0..entries)
            .map(|i| {
                json!({
                    "dt": i * 10_800,
                    "main": { "temp": 20.0 + i as f64 },
                    "wind": { "speed": speed(i) }
                })
            })
            .collect();
        json!({ "cod": "200", "list": list })
    }

    fn provider() -> OpenWeatherProvider {
        OpenWeatherProvider::new(Some("KEY".into())).unwrap()
    }

    #[test]
    fn averages_three_hour_buckets_of_the_day() {
        let raw = forecast(40, |i| if i < 8 { 5.0 } else { 10.0 });

        let today = provider().parse(&raw, 0).unwrap();
        assert!((today.wind_knots - 5.0 * 1.94384).abs() < 1e-9);
        assert!((today.temperature_c - 23.5).abs() < 1e-9);
        assert_eq!(today.wave_height_m, 0.0);

        let tomorrow = provider().parse(&raw, 1).unwrap();
        assert!((tomorrow.wind_knots - 19.4384).abs() < 1e-3);
        assert!((tomorrow.temperature_c - 31.5).abs() < 1e-9);
    }

    #[test]
    fn incomplete_day_is_out_of_range() {
        let raw = forecast(20, |_| 1.0);
        let err = provider().parse(&raw, 2).unwrap_err();
        assert!(matches!(err, ProviderError::DayOutOfRange { day_index: 2, available: 2 }));
    }

    #[test]
    fn missing_list_is_a_schema_error() {
        let err = provider().parse(&json!({ "cod": "401" }), 0).unwrap_err();
        assert!(matches!(err, ProviderError::Schema(_)));
    }

    #[tokio::test]
    async fn fetch_without_key_fails_fast() {
        let provider = OpenWeatherProvider::new(None).unwrap();
        let err = provider.fetch(39.6, 2.3).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
    }
}
