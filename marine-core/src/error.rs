use reqwest::StatusCode;
use thiserror::Error;

/// Why a provider produced no record for a zone/day.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response body is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response does not match the expected schema")]
    Schema(#[source] serde_json::Error),

    #[error("no data for day {day_index} ({available} days available)")]
    DayOutOfRange { day_index: usize, available: usize },

    #[error("no samples for day {day_index}")]
    EmptyDay { day_index: usize },

    #[error("`{field}` is null for day {day_index}")]
    MissingValue { field: &'static str, day_index: usize },
}

impl ProviderError {
    /// Whether another attempt could possibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Transport(_)
                | ProviderError::Status { .. }
                | ProviderError::InvalidJson(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to reach the messaging endpoint")]
    Transport(#[source] reqwest::Error),

    #[error("messaging endpoint responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(!ProviderError::MissingApiKey.is_retryable());
        assert!(!ProviderError::EmptyDay { day_index: 0 }.is_retryable());
        assert!(
            ProviderError::Status { status: StatusCode::BAD_GATEWAY, body: String::new() }
                .is_retryable()
        );
    }
}
