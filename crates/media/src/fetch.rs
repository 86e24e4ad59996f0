use {async_trait::async_trait, bytes::Bytes};

use crate::error::Result;

/// Source of platform-hosted message content.
///
/// The production implementation goes through the messaging API's content
/// endpoint; tests substitute canned bytes.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, message_id: &str) -> Result<Bytes>;
}
