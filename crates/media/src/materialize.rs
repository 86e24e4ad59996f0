//! Turns inbound media references into public URLs.

use std::sync::Arc;

use tracing::warn;

use crate::{
    error::Result,
    fetch::ContentFetcher,
    store::ContentStore,
    transform::Transformer,
};

/// Preview images are downscaled to this width.
const PREVIEW_WIDTH: u32 = 240;

/// Where a media payload lives, as reported by the inbound event.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// Platform-hosted, must go through the content endpoint.
    Hosted { message_id: String },
    /// Hosted on an external CDN, URLs usable as-is.
    External {
        original_url: String,
        preview_url: Option<String>,
    },
}

impl MediaSource {
    #[must_use]
    pub fn hosted(message_id: impl Into<String>) -> Self {
        Self::Hosted {
            message_id: message_id.into(),
        }
    }
}

/// Public URLs ready to be embedded in a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedContent {
    pub url: String,
    pub preview_url: Option<String>,
}

/// Orchestrates fetch, store and transform for hosted content.
///
/// Externally-hosted content passes through untouched: no fetch, no file
/// writes. Transform failures are logged and degraded, never propagated;
/// fetch and store failures are.
pub struct Materializer {
    fetcher: Arc<dyn ContentFetcher>,
    transformer: Arc<dyn Transformer>,
    store: ContentStore,
}

impl Materializer {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        transformer: Arc<dyn Transformer>,
        store: ContentStore,
    ) -> Self {
        Self {
            fetcher,
            transformer,
            store,
        }
    }

    /// Image: hosted content is downloaded once, then a downscaled
    /// preview is derived next to it.
    pub async fn image(&self, source: &MediaSource) -> Result<MaterializedContent> {
        let message_id = match source {
            MediaSource::External {
                original_url,
                preview_url,
            } => {
                return Ok(MaterializedContent {
                    url: original_url.clone(),
                    preview_url: Some(
                        preview_url.clone().unwrap_or_else(|| original_url.clone()),
                    ),
                });
            },
            MediaSource::Hosted { message_id } => message_id,
        };

        let bytes = self.fetcher.fetch(message_id).await?;
        let original = self.store.save("jpg", &bytes).await?;
        let preview = self.store.derived(&original, "preview", "jpg");

        let preview_url = match self
            .transformer
            .resize(&original.path, &preview.path, PREVIEW_WIDTH)
            .await
        {
            Ok(()) => self.store.url_for(&preview.name),
            Err(e) => {
                warn!(message_id, error = %e, "preview resize failed, copying full image");
                // The reply still needs a live preview URL, so stand in
                // with a full-size copy.
                match tokio::fs::copy(&original.path, &preview.path).await {
                    Ok(_) => self.store.url_for(&preview.name),
                    Err(copy_err) => {
                        warn!(message_id, error = %copy_err, "preview copy failed, reusing original URL");
                        self.store.url_for(&original.name)
                    },
                }
            },
        };

        Ok(MaterializedContent {
            url: self.store.url_for(&original.name),
            preview_url: Some(preview_url),
        })
    }

    /// Audio: stored as-is, no derivative.
    pub async fn audio(&self, source: &MediaSource) -> Result<MaterializedContent> {
        let message_id = match source {
            MediaSource::External { original_url, .. } => {
                return Ok(MaterializedContent {
                    url: original_url.clone(),
                    preview_url: None,
                });
            },
            MediaSource::Hosted { message_id } => message_id,
        };

        let bytes = self.fetcher.fetch(message_id).await?;
        let stored = self.store.save("m4a", &bytes).await?;
        Ok(MaterializedContent {
            url: self.store.url_for(&stored.name),
            preview_url: None,
        })
    }

    /// Video: hosted content gets a first-frame still as its preview.
    pub async fn video(&self, source: &MediaSource) -> Result<MaterializedContent> {
        let message_id = match source {
            MediaSource::External {
                original_url,
                preview_url,
            } => {
                return Ok(MaterializedContent {
                    url: original_url.clone(),
                    preview_url: Some(
                        preview_url.clone().unwrap_or_else(|| original_url.clone()),
                    ),
                });
            },
            MediaSource::Hosted { message_id } => message_id,
        };

        let bytes = self.fetcher.fetch(message_id).await?;
        let stored = self.store.save("mp4", &bytes).await?;
        let preview = self.store.derived(&stored, "preview", "jpg");

        let video_url = self.store.url_for(&stored.name);
        let preview_url = match self
            .transformer
            .extract_frame(&stored.path, &preview.path)
            .await
        {
            Ok(()) => self.store.url_for(&preview.name),
            Err(e) => {
                warn!(message_id, error = %e, "frame extraction failed, reusing video URL");
                video_url.clone()
            },
        };

        Ok(MaterializedContent {
            url: video_url,
            preview_url: Some(preview_url),
        })
    }
}
