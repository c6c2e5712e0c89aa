use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::NotifyError,
    services::{alert_monitor::AlertSink, message::AlertMessage},
};

pub const DEFAULT_BASE_URL: &str = "https://api.pushover.net";

/// Delivery knobs for emergency-priority messages.
///
/// With priority 2 Pushover repeats the notification every `retry` seconds
/// until it is acknowledged or `expire` seconds pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub sound: String,
    pub priority: i8,
    pub retry_secs: u32,
    pub expire_secs: u32,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            sound: "siren".to_string(),
            priority: 2,
            retry_secs: 30,
            expire_secs: 3600,
        }
    }
}

#[derive(Clone)]
pub struct PushoverClient {
    http: Client,
    base_url: String,
    api_token: String,
    user_key: String,
    options: DeliveryOptions,
}

impl PushoverClient {
    pub fn new(
        base_url: impl Into<String>,
        api_token: String,
        user_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            user_key,
            options: DeliveryOptions::default(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_token.trim().is_empty() && !self.user_key.trim().is_empty()
    }

    fn form<'a>(&'a self, message: &'a AlertMessage) -> MessageForm<'a> {
        MessageForm {
            token: &self.api_token,
            user: &self.user_key,
            message: &message.body,
            title: &message.title,
            sound: &self.options.sound,
            priority: self.options.priority,
            retry: self.options.retry_secs,
            expire: self.options.expire_secs,
        }
    }

    pub async fn send(&self, message: &AlertMessage) -> Result<MessageReceipt, NotifyError> {
        if !self.has_credentials() {
            return Err(NotifyError::MissingCredentials);
        }

        let url = format!("{}/1/messages.json", self.base_url);
        let res = self.http.post(&url).form(&self.form(message)).send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        // a 2xx means the message was accepted; only an explicit status 0 is a rejection
        let body = res.text().await.unwrap_or_default();
        let receipt: MessageReceipt = serde_json::from_str(&body).unwrap_or_default();
        if receipt.status == Some(0) {
            return Err(NotifyError::Rejected(if receipt.errors.is_empty() {
                body
            } else {
                receipt.errors.join("; ")
            }));
        }

        Ok(receipt)
    }
}

impl AlertSink for PushoverClient {
    async fn deliver(&self, message: &AlertMessage) -> Result<(), NotifyError> {
        self.send(message).await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct MessageForm<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    title: &'a str,
    sound: &'a str,
    priority: i8,
    retry: u32,
    expire: u32,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MessageReceipt {
    #[serde(default)]
    pub status: Option<i64>,

    #[serde(default)]
    pub request: Option<String>,

    // emergency-priority messages only
    #[serde(default)]
    pub receipt: Option<String>,

    #[serde(default)]
    pub errors: Vec<String>,
}
