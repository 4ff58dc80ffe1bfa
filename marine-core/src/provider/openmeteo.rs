use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::ProviderError,
    model::ProviderForecastRecord,
    provider::{ProviderId, get_json, http_client},
    units::kmh_to_knots,
};

use super::ForecastProvider;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const TIMEOUT: Duration = Duration::from_secs(20);
const DAILY_FIELDS: &str = "temperature_2m_max,windspeed_10m_max";
const TIMEZONE: &str = "Europe/Madrid";
const FORECAST_DAYS: &str = "3";

/// Keyless provider reporting daily maxima in km/h.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { http: http_client(TIMEOUT)? })
    }
}

// Open-Meteo fills gaps with `null`.
#[derive(Debug, Deserialize)]
struct OmDaily {
    windspeed_10m_max: Vec<Option<f64>>,
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default, alias = "waveheight_max")]
    wave_height_max: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    daily: OmDaily,
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Value, ProviderError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        get_json(
            &self.http,
            FORECAST_URL,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("daily", DAILY_FIELDS),
                ("timezone", TIMEZONE),
                ("forecast_days", FORECAST_DAYS),
            ],
        )
        .await
    }

    fn parse(
        &self,
        raw: &Value,
        day_index: usize,
    ) -> Result<ProviderForecastRecord, ProviderError> {
        let daily = OmResponse::deserialize(raw).map_err(ProviderError::Schema)?.daily;

        let available = daily.windspeed_10m_max.len().min(daily.temperature_2m_max.len());
        if day_index >= available {
            return Err(ProviderError::DayOutOfRange { day_index, available });
        }

        let wind_kph = daily.windspeed_10m_max[day_index]
            .ok_or(ProviderError::MissingValue { field: "windspeed_10m_max", day_index })?;
        let temperature_c = daily.temperature_2m_max[day_index]
            .ok_or(ProviderError::MissingValue { field: "temperature_2m_max", day_index })?;
        let wave_height_m = daily
            .wave_height_max
            .and_then(|waves| waves.get(day_index).copied().flatten())
            .unwrap_or(0.0);

        Ok(ProviderForecastRecord {
            wind_knots: kmh_to_knots(wind_kph),
            temperature_c,
            wave_height_m,
        })
    }
}
