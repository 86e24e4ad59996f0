//! Reply and content endpoint client.

use std::time::Duration;

use {
    bytes::Bytes,
    secrecy::{ExposeSecret, Secret},
    serde::Serialize,
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    messages::OutboundMessage,
};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_BLOB_BASE: &str = "https://api-data.line.me";

/// Reply endpoint hard limit on messages per call.
pub const MAX_REPLY_MESSAGES: usize = 5;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    notification_disabled: bool,
}

/// HTTP client for the messaging API.
///
/// Replies go to `api_base`, binary message content comes from
/// `blob_base`. Both are overridable so tests can point at a local
/// server.
pub struct LineClient {
    http: reqwest::Client,
    token: Secret<String>,
    api_base: String,
    blob_base: String,
}

impl LineClient {
    pub fn new(token: Secret<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            blob_base: DEFAULT_BLOB_BASE.to_string(),
        })
    }

    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    #[must_use]
    pub fn with_blob_base(mut self, base: impl Into<String>) -> Self {
        self.blob_base = base.into();
        self
    }

    /// Send up to [`MAX_REPLY_MESSAGES`] messages against a reply token.
    ///
    /// Contract violations (blank token, empty or oversized batch) fail
    /// before any request is made.
    pub async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<()> {
        self.reply_with(reply_token, messages, false).await
    }

    /// [`reply`](Self::reply) with the push notification suppressed when
    /// `silent` is set.
    pub async fn reply_with(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
        silent: bool,
    ) -> Result<()> {
        if reply_token.trim().is_empty() {
            return Err(Error::invalid_input("reply token is empty"));
        }
        if messages.is_empty() {
            return Err(Error::invalid_input("reply carries no messages"));
        }
        if messages.len() > MAX_REPLY_MESSAGES {
            return Err(Error::invalid_input(format!(
                "reply carries {} messages, limit is {MAX_REPLY_MESSAGES}",
                messages.len()
            )));
        }

        let url = format!("{}/v2/bot/message/reply", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&ReplyRequest {
                reply_token,
                messages,
                notification_disabled: silent,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), detail));
        }

        debug!(message_count = messages.len(), "reply delivered");
        Ok(())
    }

    /// Download the binary payload of a platform-hosted message.
    pub async fn get_content(&self, message_id: &str) -> Result<Bytes> {
        if message_id.is_empty() {
            return Err(Error::invalid_input("message id is empty"));
        }

        let url = format!("{}/v2/bot/message/{message_id}/content", self.blob_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), detail));
        }

        let bytes = response.bytes().await?;
        debug!(message_id, size = bytes.len(), "content downloaded");
        Ok(bytes)
    }
}
