use crate::{
    Config,
    error::{ProviderError, truncate_body},
    model::{ProviderForecastRecord, Zone},
    provider::{
        openmeteo::OpenMeteoProvider, openweather::OpenWeatherProvider,
        weatherapi::WeatherApiProvider,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{convert::TryFrom, fmt::Debug};

pub mod openmeteo;
pub mod openweather;
pub mod weatherapi;

/// Each fetch is tried at most this many times, back to back.
pub const FETCH_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::OpenMeteo => "openmeteo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OpenWeatherMap",
            ProviderId::WeatherApi => "WeatherAPI",
            ProviderId::OpenMeteo => "Open-Meteo",
        }
    }

    /// Call order matters: it is the order requests go out for every zone/day.
    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi, ProviderId::OpenMeteo]
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderId::OpenMeteo)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. \
                 Supported providers: openweather, weatherapi, openmeteo."
            )),
        }
    }
}

/// Result of asking one provider about one zone/day.
#[derive(Debug)]
pub enum ProviderOutcome {
    Ok(ProviderForecastRecord),
    Failed(ProviderError),
}

impl ProviderOutcome {
    pub fn record(&self) -> Option<&ProviderForecastRecord> {
        match self {
            ProviderOutcome::Ok(record) => Some(record),
            ProviderOutcome::Failed(_) => None,
        }
    }
}

impl From<Result<ProviderForecastRecord, ProviderError>> for ProviderOutcome {
    fn from(res: Result<ProviderForecastRecord, ProviderError>) -> Self {
        match res {
            Ok(record) => ProviderOutcome::Ok(record),
            Err(err) => ProviderOutcome::Failed(err),
        }
    }
}

/// A multi-day forecast source.
///
/// `fetch` returns the raw JSON document; `parse` picks one day out of it and
/// normalizes wind to knots.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<Value, ProviderError>;

    fn parse(
        &self,
        raw: &Value,
        day_index: usize,
    ) -> Result<ProviderForecastRecord, ProviderError>;
}

/// `fetch` with immediate retries, up to [`FETCH_ATTEMPTS`] in total.
pub async fn fetch_with_retry(
    provider: &dyn ForecastProvider,
    latitude: f64,
    longitude: f64,
) -> Result<Value, ProviderError> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match provider.fetch(latitude, longitude).await {
            Ok(raw) => return Ok(raw),
            Err(err) => {
                if attempt >= FETCH_ATTEMPTS || !err.is_retryable() {
                    return Err(err);
                }
                tracing::debug!(
                    provider = %provider.id(),
                    attempt,
                    error = %err,
                    "forecast fetch failed; retrying"
                );
            }
        }
    }
}

/// Fetch and parse a single day for a zone. Never fails past this boundary.
pub async fn forecast_day(
    provider: &dyn ForecastProvider,
    zone: &Zone,
    day_index: usize,
) -> ProviderOutcome {
    let raw = match fetch_with_retry(provider, zone.latitude, zone.longitude).await {
        Ok(raw) => raw,
        Err(err) => return ProviderOutcome::Failed(err),
    };
    provider.parse(&raw, day_index).into()
}

/// GET `url` and decode the body as JSON, mapping every failure to a [`ProviderError`].
pub(crate) async fn get_json<Q>(
    http: &Client,
    url: &str,
    query: &Q,
) -> Result<Value, ProviderError>
where
    Q: serde::Serialize + ?Sized,
{
    let res = http.get(url).query(query).send().await.map_err(ProviderError::Transport)?;

    let status = res.status();
    let body = res.text().await.map_err(ProviderError::Transport)?;

    if !status.is_success() {
        return Err(ProviderError::Status { status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(ProviderError::InvalidJson)
}

pub(crate) fn http_client(timeout: std::time::Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| anyhow::anyhow!("Failed to build HTTP client: {err}"))
}

/// Construct one provider from config.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn ForecastProvider>> {
    if id.requires_api_key() && !config.is_provider_configured(id) {
        tracing::warn!(
            provider = %id,
            "no API key configured; this provider will not contribute. \
             Hint: run `marine configure {id}` or set the environment variable."
        );
    }

    let api_key = config.provider_api_key(id).map(str::to_owned);
    let boxed: Box<dyn ForecastProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key)?),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key)?),
        ProviderId::OpenMeteo => Box::new(OpenMeteoProvider::new()?),
    };

    Ok(boxed)
}

/// All providers in call order.
pub fn providers_from_config(
    config: &Config,
) -> anyhow::Result<Vec<Box<dyn ForecastProvider>>> {
    ProviderId::all().iter().map(|&id| provider_from_config(id, config)).collect()
}
