use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    config::DeliveryCredentials,
    error::{NotifyError, truncate_body},
    provider::http_client,
};

const TELEGRAM_API: &str = "https://api.telegram.org";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers a rendered report to a single recipient.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    base_url: String,
    credentials: DeliveryCredentials,
    http: Client,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramNotifier {
    pub fn new(credentials: DeliveryCredentials) -> anyhow::Result<Self> {
        Ok(Self { base_url: TELEGRAM_API.to_string(), credentials, http: http_client(TIMEOUT)? })
    }

    fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/bot{}/sendMessage", self.credentials.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let payload = SendMessage { chat_id: &self.credentials.chat_id, text };

        let res = self
            .http
            .post(self.url())
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.without_url()))?;

        let status = res.status();
        if status.is_success() {
            tracing::info!(chat_id = %self.credentials.chat_id, "report delivered");
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        Err(NotifyError::Status { status, body: truncate_body(&body) })
    }
}
