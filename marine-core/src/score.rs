use serde::{Deserialize, Serialize};
use std::fmt;

/// Safety tier derived from averaged wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Dangerous,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Dangerous => "DANGEROUS",
            Rating::Fair => "FAIR",
            Rating::Good => "GOOD",
            Rating::Excellent => "EXCELLENT",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Rating::Dangerous => "🔴",
            Rating::Fair => "🟠",
            Rating::Good => "🟡",
            Rating::Excellent => "🟢",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.as_str())
    }
}

/// Map wind speed in knots to `(score, rating)`.
///
/// Thresholds are strict, so 10, 7 and 5 knots land in the calmer bracket.
pub fn score(wind_knots: f64) -> (u8, Rating) {
    if wind_knots > 10.0 {
        (2, Rating::Dangerous)
    } else if wind_knots > 7.0 {
        (4, Rating::Fair)
    } else if wind_knots > 5.0 {
        (7, Rating::Good)
    } else {
        (10, Rating::Excellent)
    }
}
