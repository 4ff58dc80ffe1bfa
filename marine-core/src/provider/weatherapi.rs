use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::ProviderError,
    model::ProviderForecastRecord,
    provider::{ProviderId, get_json, http_client},
    units::{kmh_to_knots, mean},
};

use super::ForecastProvider;

const FORECAST_URL: &str = "https://api.weatherapi.com/v1/forecast.json";
const TIMEOUT: Duration = Duration::from_secs(15);
const FORECAST_DAYS: &str = "3";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        Ok(Self { api_key, http: http_client(TIMEOUT)? })
    }
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    temp_c: f64,
    wind_kph: f64,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Value, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let q = format!("{latitude},{longitude}");

        get_json(
            &self.http,
            FORECAST_URL,
            &[("key", api_key), ("q", q.as_str()), ("days", FORECAST_DAYS), ("aqi", "no")],
        )
        .await
    }

    /// Wind is the strongest hourly value of the day; temperature is the hourly mean.
    fn parse(
        &self,
        raw: &Value,
        day_index: usize,
    ) -> Result<ProviderForecastRecord, ProviderError> {
        let parsed = WaForecastResponse::deserialize(raw).map_err(ProviderError::Schema)?;
        let days = parsed.forecast.forecastday;

        let day = days
            .get(day_index)
            .ok_or(ProviderError::DayOutOfRange { day_index, available: days.len() })?;

        if day.hour.is_empty() {
            return Err(ProviderError::EmptyDay { day_index });
        }

        let wind_kph = day.hour.iter().map(|h| h.wind_kph).fold(f64::NEG_INFINITY, f64::max);
        let temps: Vec<f64> = day.hour.iter().map(|h| h.temp_c).collect();
        let temperature_c = mean(&temps).ok_or(ProviderError::EmptyDay { day_index })?;

        Ok(ProviderForecastRecord {
            wind_knots: kmh_to_knots(wind_kph),
            temperature_c,
            wave_height_m: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> WeatherApiProvider {
        WeatherApiProvider::new(Some("KEY".into())).unwrap()
    }

    fn hours(winds: &[f64], temp: f64) -> Vec<Value> {
        winds
            .iter()
            .map(|w| {
                json!({
                    "time_epoch": 0,
                    "temp_c": temp,
                    "wind_kph": w,
                    "condition": { "text": "Sunny" }
                })
            })
            .collect()
    }

    #[test]
    fn takes_hourly_maximum_wind() {
        let raw = json!({
            "location": { "name": "Palma", "country": "Spain" },
            "forecast": { "forecastday": [
                { "hour": hours(&[4.0, 10.0, 6.0], 18.0) },
                { "hour": hours(&[20.0, 2.0], 22.0) },
            ]}
        });

        let today = provider().parse(&raw, 0).unwrap();
        assert!((today.wind_knots - 5.39957).abs() < 1e-6);
        assert_eq!(today.temperature_c, 18.0);

        let tomorrow = provider().parse(&raw, 1).unwrap();
        assert!((tomorrow.wind_knots - 20.0 * 0.539957).abs() < 1e-9);
        assert_eq!(tomorrow.wave_height_m, 0.0);
    }

    #[test]
    fn day_beyond_forecast_is_out_of_range() {
        let raw = json!({ "forecast": { "forecastday": [ { "hour": hours(&[1.0], 10.0) } ] } });
        let err = provider().parse(&raw, 2).unwrap_err();
        assert!(matches!(err, ProviderError::DayOutOfRange { day_index: 2, available: 1 }));
    }

    #[test]
    fn day_without_hours_is_empty() {
        let raw = json!({ "forecast": { "forecastday": [ { "hour": [] } ] } });
        let err = provider().parse(&raw, 0).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyDay { day_index: 0 }));
    }

    #[test]
    fn error_payload_is_a_schema_error() {
        let raw = json!({ "error": { "code": 2006, "message": "API key is invalid." } });
        assert!(matches!(provider().parse(&raw, 0), Err(ProviderError::Schema(_))));
    }
}
