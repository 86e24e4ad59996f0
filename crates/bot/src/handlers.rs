//! Event dispatch.
//!
//! One decoded webhook event in, at most one reply batch out. Events
//! without a reply token are acknowledged in the log and dropped.

use {
    tracing::{debug, info, warn},
    uuid::Uuid,
};

use {
    meishi_config::ProfileConfig,
    meishi_line::{ContentProvider, InboundEvent, MessageContent, OutboundMessage, Source},
    meishi_media::{MaterializedContent, Materializer, MediaSource},
};

use crate::{
    commands::{self, CommandContext},
    error::Result,
    outbound::Replier,
};

/// Routes decoded webhook events to their handlers.
pub struct Dispatcher {
    replier: Replier,
    materializer: Materializer,
    profile: ProfileConfig,
    base_url: String,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        replier: Replier,
        materializer: Materializer,
        profile: ProfileConfig,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            replier,
            materializer,
            profile,
            base_url: base_url.into(),
        }
    }

    /// Handle one event. An error means a reply or a media fetch
    /// failed; events this bot does not act on return `Ok`.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Message {
                reply_token,
                source,
                message,
                ..
            } => self.handle_message(&reply_token, &source, message).await,
            InboundEvent::Follow {
                reply_token,
                source,
            } => {
                info!(%source, "followed");
                self.replier
                    .reply_text(&reply_token, "Got followed event")
                    .await
            },
            InboundEvent::Unfollow { source } => {
                info!(%source, "unfollowed");
                Ok(())
            },
            InboundEvent::Join {
                reply_token,
                source,
            } => {
                self.replier
                    .reply_text(&reply_token, format!("Joined {source}"))
                    .await
            },
            InboundEvent::Leave { source } => {
                info!(%source, "left chat");
                Ok(())
            },
            InboundEvent::MemberJoined {
                reply_token,
                joined,
                ..
            } => {
                self.replier
                    .reply_text(
                        &reply_token,
                        format!("Got memberJoined message {}", joined.user_ids()),
                    )
                    .await
            },
            InboundEvent::MemberLeft { source, left } => {
                info!(%source, members = %left.user_ids(), "members left");
                Ok(())
            },
            InboundEvent::Postback {
                reply_token,
                postback,
                ..
            } => {
                self.replier
                    .reply_text(
                        &reply_token,
                        format!(
                            "Got postback data {}, param {:?}",
                            postback.data, postback.params
                        ),
                    )
                    .await
            },
            InboundEvent::Beacon {
                reply_token,
                beacon,
                ..
            } => {
                self.replier
                    .reply_text(&reply_token, format!("Got beacon message {}", beacon.hwid))
                    .await
            },
            InboundEvent::VideoPlayComplete {
                reply_token,
                video_play_complete,
                ..
            } => {
                self.replier
                    .reply_text(
                        &reply_token,
                        format!("You played {}", video_play_complete.tracking_id),
                    )
                    .await
            },
            InboundEvent::Unsend { source, unsend } => {
                info!(%source, message_id = %unsend.message_id, "message unsent");
                Ok(())
            },
            InboundEvent::Unknown => {
                debug!("ignoring unknown event kind");
                Ok(())
            },
        }
    }

    async fn handle_message(
        &self,
        reply_token: &str,
        source: &Source,
        message: MessageContent,
    ) -> Result<()> {
        match message {
            MessageContent::Text { text, .. } => {
                info!(%source, %text, "got text message");
                let context = CommandContext {
                    profile: &self.profile,
                    base_url: &self.base_url,
                };
                self.replier
                    .reply(reply_token, commands::respond(&text, &context))
                    .await
            },
            MessageContent::Sticker {
                package_id,
                sticker_id,
                ..
            } => {
                self.replier
                    .reply(reply_token, vec![OutboundMessage::sticker(
                        package_id, sticker_id,
                    )])
                    .await
            },
            MessageContent::Location {
                title,
                address,
                latitude,
                longitude,
                ..
            } => {
                self.replier
                    .reply(reply_token, vec![OutboundMessage::Location {
                        title: title.unwrap_or_default(),
                        address: address.unwrap_or_default(),
                        latitude,
                        longitude,
                    }])
                    .await
            },
            MessageContent::Image {
                id,
                content_provider,
            } => {
                let media = self
                    .materialize(
                        reply_token,
                        self.materializer
                            .image(&media_source(&id, content_provider))
                            .await,
                    )
                    .await?;
                let preview = media.preview_url.unwrap_or_else(|| media.url.clone());
                self.replier
                    .reply(reply_token, vec![OutboundMessage::image(media.url, preview)])
                    .await
            },
            MessageContent::Audio {
                id,
                duration,
                content_provider,
            } => {
                let media = self
                    .materialize(
                        reply_token,
                        self.materializer
                            .audio(&media_source(&id, content_provider))
                            .await,
                    )
                    .await?;
                self.replier
                    .reply(reply_token, vec![OutboundMessage::Audio {
                        original_content_url: media.url,
                        duration,
                    }])
                    .await
            },
            MessageContent::Video {
                id,
                content_provider,
            } => {
                let media = self
                    .materialize(
                        reply_token,
                        self.materializer
                            .video(&media_source(&id, content_provider))
                            .await,
                    )
                    .await?;
                let tracking_id = Uuid::new_v4().to_string();
                info!(%tracking_id, "sending video reply");
                let preview = media.preview_url.unwrap_or_else(|| media.url.clone());
                self.replier
                    .reply(reply_token, vec![OutboundMessage::Video {
                        original_content_url: media.url,
                        preview_image_url: preview,
                        tracking_id,
                    }])
                    .await
            },
            MessageContent::File {
                file_name,
                file_size,
                ..
            } => {
                self.replier
                    .reply_text(
                        reply_token,
                        format!("Received '{file_name}'({file_size} bytes)"),
                    )
                    .await
            },
            MessageContent::Unknown => {
                debug!(%source, "ignoring unsupported message kind");
                Ok(())
            },
        }
    }

    /// Unwrap a materializer outcome. On failure the sender gets a
    /// best-effort error text on the same reply handle, then the
    /// original error propagates.
    async fn materialize(
        &self,
        reply_token: &str,
        outcome: meishi_media::Result<MaterializedContent>,
    ) -> Result<MaterializedContent> {
        match outcome {
            Ok(content) => Ok(content),
            Err(err) => {
                warn!(error = %err, "failed to materialize inbound media");
                let note = format!("Cannot get image: {err}");
                if let Err(reply_err) = self.replier.reply_text(reply_token, note).await {
                    warn!(error = %reply_err, "failed to send media error reply");
                }
                Err(err.into())
            },
        }
    }
}

fn media_source(message_id: &str, provider: ContentProvider) -> MediaSource {
    match provider {
        ContentProvider::Line => MediaSource::hosted(message_id),
        ContentProvider::External {
            original_content_url,
            preview_image_url,
        } => MediaSource::External {
            original_url: original_content_url,
            preview_url: preview_image_url,
        },
    }
}
