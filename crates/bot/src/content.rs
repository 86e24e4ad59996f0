//! Feeds the platform's message content endpoint into the media
//! pipeline.

use {async_trait::async_trait, bytes::Bytes, std::sync::Arc};

use {meishi_line::LineClient, meishi_media::ContentFetcher};

/// [`ContentFetcher`] backed by the platform blob API.
pub struct LineContentFetcher {
    client: Arc<LineClient>,
}

impl LineContentFetcher {
    #[must_use]
    pub fn new(client: Arc<LineClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentFetcher for LineContentFetcher {
    async fn fetch(&self, message_id: &str) -> meishi_media::Result<Bytes> {
        self.client
            .get_content(message_id)
            .await
            .map_err(meishi_media::Error::fetch)
    }
}
