//! Core library for the `marine` offshore outlook job.
//!
//! This crate defines:
//! - Forecast provider adapters and their typed failure outcomes
//! - Per zone/day aggregation across providers and wind-based scoring
//! - Report building, ranking and rendering
//! - Configuration & credentials handling, and report delivery
//!
//! It is used by `marine-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod job;
pub mod model;
pub mod notify;
pub mod progress;
pub mod provider;
pub mod render;
pub mod report;
pub mod score;
pub mod units;
pub mod zones;

pub use aggregate::{Aggregation, Aggregator};
pub use config::{Config, DeliveryCredentials, ProviderConfig, TelegramConfig};
pub use error::{NotifyError, ProviderError};
pub use job::RunSummary;
pub use model::{
    AggregatedRecord, BestRecommendation, DayReport, ProviderForecastRecord, Report, ScoredZone,
    Zone,
};
pub use notify::{Notifier, TelegramNotifier};
pub use progress::{NoProgress, ProgressObserver, TracingProgress};
pub use provider::{ForecastProvider, ProviderId, ProviderOutcome};
pub use render::render;
pub use report::{HORIZON_DAYS, build_report};
pub use score::{Rating, score};
