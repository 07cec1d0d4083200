use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay responded with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("mail relay response did not include a message id")]
    MissingMessageId,
}

/// Outbound email. Returns the provider's message id.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError>;
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Clone, Debug)]
pub struct HttpRelayMailer {
    client: Client,
    relay_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpRelayMailer {
    pub fn new(relay_url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: Client::new(),
            relay_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let body = RelayRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: message.text.as_deref(),
            html: message.html.as_deref(),
        };

        let mut request = self.client.post(&self.relay_url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        let payload: Value = response.json().await?;
        let message_id = payload
            .get("messageId")
            .or_else(|| payload.get("id"))
            .and_then(Value::as_str)
            .ok_or(MailError::MissingMessageId)?;

        log::info!("Sent email to {} ({})", message.to, message_id);
        Ok(message_id.to_string())
    }
}

/// Development mailer: writes the message to the log instead of sending it.
#[derive(Clone, Debug)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
        let message_id = format!("<{}@clubhub.local>", uuid::Uuid::new_v4());
        log::info!(
            "Email from {} to {} ({}): {}\n{}",
            self.from,
            message.to,
            message_id,
            message.subject,
            message
                .text
                .as_deref()
                .or(message.html.as_deref())
                .unwrap_or_default()
        );
        Ok(message_id)
    }
}

pub fn mailer_from_config(config: &Config) -> Arc<dyn Mailer> {
    match &config.mail_relay_url {
        Some(relay_url) => Arc::new(HttpRelayMailer::new(
            relay_url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )),
        None => {
            log::warn!("MAIL_RELAY_URL is not set; emails will only be logged");
            Arc::new(LogMailer::new(config.mail_from.clone()))
        }
    }
}
