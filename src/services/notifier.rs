use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{error::DeliveryError, models::OwnerId};

/// Sink for outgoing messages. Failures are returned, never panicked on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: OwnerId, message: &str) -> Result<(), DeliveryError>;
}

/// Delivers through the Telegram Bot API `sendMessage` call.
#[derive(Clone)]
pub struct TelegramNotifier {
    http: Client,
    api_base: String,
    token: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: String,
        token: String,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, recipient: OwnerId, message: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);

        let res = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": recipient,
                "text": message,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .json::<SendMessageResponse>()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        if !status.is_success() || !body.ok {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: body.description.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
