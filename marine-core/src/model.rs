use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::score::Rating;

/// A named coastal point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Zone {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self { name: name.into(), latitude, longitude }
    }
}

/// One provider's normalized view of a single forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProviderForecastRecord {
    pub wind_knots: f64,
    pub temperature_c: f64,
    /// Zero when the provider does not report waves.
    pub wave_height_m: f64,
}

/// Mean of the providers that answered for a zone/day.
///
/// Wave height is collected per provider but intentionally not carried here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub wind_knots: f64,
    pub temperature_c: f64,
    /// Share of providers that returned usable data, in percent.
    pub confidence_pct: f64,
    pub sources: usize,
    pub total_providers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredZone {
    pub zone: String,
    pub record: AggregatedRecord,
    pub score: u8,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub day_index: usize,
    pub date: NaiveDate,
    /// Sorted by score, best first. Equal scores keep registration order.
    pub zones: Vec<ScoredZone>,
}

/// Human label for a day offset from the run date.
pub fn day_label(day_index: usize) -> &'static str {
    match day_index {
        0 => "Today",
        1 => "Tomorrow",
        2 => "Day after tomorrow",
        _ => "Later",
    }
}

impl DayReport {
    pub fn label(&self) -> &'static str {
        day_label(self.day_index)
    }

    pub fn short_date(&self) -> String {
        self.date.format("%d/%m").to_string()
    }

    pub fn top(&self, n: usize) -> &[ScoredZone] {
        &self.zones[..self.zones.len().min(n)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRecommendation {
    pub day_index: usize,
    pub date: NaiveDate,
    pub zone: ScoredZone,
}

impl BestRecommendation {
    pub fn label(&self) -> &'static str {
        day_label(self.day_index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub days: Vec<DayReport>,
    pub best: Option<BestRecommendation>,
}
