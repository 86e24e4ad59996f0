//! Reply-side policy.
//!
//! Handlers talk to the platform through [`ReplyGateway`] so they can be
//! exercised against a spy in tests. [`Replier`] sits in front of the
//! gateway and enforces what the reply endpoint would reject anyway:
//! no blank reply token, no text body over the length cap.

use {async_trait::async_trait, std::sync::Arc};

use meishi_line::{LineClient, OutboundMessage};

use crate::error::{Error, Result};

/// Longest text body the reply endpoint accepts, in characters.
pub const MAX_TEXT_CHARS: usize = 1000;

const ELLIPSIS: &str = "……";

/// Delivers a prepared batch for a one-shot reply handle.
///
/// `silent` asks the platform to skip the push notification for this
/// reply. It travels untouched to the wire.
#[async_trait]
pub trait ReplyGateway: Send + Sync {
    async fn send(
        &self,
        reply_token: &str,
        messages: Vec<OutboundMessage>,
        silent: bool,
    ) -> Result<()>;
}

#[async_trait]
impl ReplyGateway for LineClient {
    async fn send(
        &self,
        reply_token: &str,
        messages: Vec<OutboundMessage>,
        silent: bool,
    ) -> Result<()> {
        self.reply_with(reply_token, &messages, silent).await?;
        Ok(())
    }
}

/// Gateway front end used by every handler.
#[derive(Clone)]
pub struct Replier {
    gateway: Arc<dyn ReplyGateway>,
}

impl Replier {
    #[must_use]
    pub fn new(gateway: Arc<dyn ReplyGateway>) -> Self {
        Self { gateway }
    }

    /// Send a prepared batch. A blank reply token fails here, before
    /// any network traffic happens.
    pub async fn reply(&self, reply_token: &str, messages: Vec<OutboundMessage>) -> Result<()> {
        self.reply_with(reply_token, messages, false).await
    }

    /// [`reply`](Self::reply), suppressing the push notification when
    /// `silent` is set.
    ///
    /// Every send funnels through here: blank tokens are rejected
    /// without touching the gateway, and each text body in the batch is
    /// capped at [`MAX_TEXT_CHARS`] characters.
    pub async fn reply_with(
        &self,
        reply_token: &str,
        messages: Vec<OutboundMessage>,
        silent: bool,
    ) -> Result<()> {
        if reply_token.trim().is_empty() {
            return Err(Error::invalid_input("reply token must not be empty"));
        }
        let messages = messages.into_iter().map(cap_text).collect();
        self.gateway.send(reply_token, messages, silent).await
    }

    /// Send a single text message.
    pub async fn reply_text(
        &self,
        reply_token: &str,
        text: impl Into<String> + Send,
    ) -> Result<()> {
        self.reply(reply_token, vec![OutboundMessage::text(text)])
            .await
    }
}

fn cap_text(message: OutboundMessage) -> OutboundMessage {
    match message {
        OutboundMessage::Text { text } => OutboundMessage::Text {
            text: truncate(text),
        },
        other => other,
    }
}

/// Oversized text keeps its leading characters and ends with a
/// two-character ellipsis, landing exactly on the cap. Counts
/// characters, not bytes.
fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_TEXT_CHARS {
        return text;
    }
    let mut clipped: String = text
        .chars()
        .take(MAX_TEXT_CHARS - ELLIPSIS.chars().count())
        .collect();
    clipped.push_str(ELLIPSIS);
    clipped
}
