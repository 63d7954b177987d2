//! Outbound chat-webhook client.
//!
//! Fire-and-forget HTTP POST of a JSON payload with plain `content` and/or rich
//! `embeds`. Payload sizes are capped by the remote service; exceeding a cap is a
//! hard client-side validation error and the message is never sent.

use serde::Serialize;
use tracing::debug;

use crate::server::error::webhook::WebhookError;

/// Maximum length of the plain-text `content` field.
pub const MAX_CONTENT_LENGTH: usize = 2000;
/// Maximum serialized length of a single embed.
pub const MAX_EMBED_LENGTH: usize = 6000;

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// ISO-8601 timestamp rendered in the embed footer area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl WebhookMessage {
    /// Enforces the remote service's size caps before anything goes on the wire.
    pub fn validate(&self) -> Result<(), WebhookError> {
        if let Some(content) = &self.content {
            let len = content.chars().count();
            if len > MAX_CONTENT_LENGTH {
                return Err(WebhookError::ContentTooLong {
                    len,
                    limit: MAX_CONTENT_LENGTH,
                });
            }
        }

        for embed in &self.embeds {
            let len = serde_json::to_string(embed)?.chars().count();
            if len > MAX_EMBED_LENGTH {
                return Err(WebhookError::EmbedTooLarge {
                    len,
                    limit: MAX_EMBED_LENGTH,
                });
            }
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    /// Validates and posts a message. The remote service answers 204 on success.
    pub async fn send(&self, message: &WebhookMessage) -> Result<(), WebhookError> {
        message.validate()?;

        let response = self.http.post(&self.url).json(message).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }

        debug!("webhook delivered with status {status}");
        Ok(())
    }
}
