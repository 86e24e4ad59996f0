//! Inbound webhook model.
//!
//! Events arrive batched in a signed envelope. Unrecognized event and
//! message kinds decode to `Unknown` so a new platform feature cannot
//! poison a whole batch.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;

/// Top-level webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    /// Bot user ID this delivery was addressed to.
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

/// Decode a raw webhook body into an envelope.
pub fn parse_envelope(body: &[u8]) -> Result<WebhookEnvelope> {
    Ok(serde_json::from_slice(body)?)
}

/// One decoded webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundEvent {
    #[serde(rename_all = "camelCase")]
    Message {
        reply_token: String,
        source: Source,
        message: MessageContent,
        #[serde(default)]
        timestamp: i64,
    },
    #[serde(rename_all = "camelCase")]
    Follow { reply_token: String, source: Source },
    Unfollow { source: Source },
    #[serde(rename_all = "camelCase")]
    Join { reply_token: String, source: Source },
    Leave { source: Source },
    #[serde(rename_all = "camelCase")]
    MemberJoined {
        reply_token: String,
        source: Source,
        joined: Members,
    },
    #[serde(rename_all = "camelCase")]
    MemberLeft { source: Source, left: Members },
    #[serde(rename_all = "camelCase")]
    Postback {
        reply_token: String,
        source: Source,
        postback: PostbackContent,
    },
    #[serde(rename_all = "camelCase")]
    Beacon {
        reply_token: String,
        source: Source,
        beacon: BeaconContent,
    },
    #[serde(rename_all = "camelCase")]
    VideoPlayComplete {
        reply_token: String,
        source: Source,
        video_play_complete: VideoPlayCompleteContent,
    },
    Unsend { source: Source, unsend: UnsendContent },
    /// Event kind this bot does not know about.
    #[serde(other)]
    Unknown,
}

/// Chat an event originated from.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Source {
    #[serde(rename_all = "camelCase")]
    User { user_id: String },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        room_id: String,
        #[serde(default)]
        user_id: Option<String>,
    },
}

impl Source {
    /// ID of the acting user, when the platform provides one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User { user_id } => Some(user_id),
            Self::Group { user_id, .. } | Self::Room { user_id, .. } => user_id.as_deref(),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User { user_id } => write!(f, "user {user_id}"),
            Self::Group { group_id, .. } => write!(f, "group {group_id}"),
            Self::Room { room_id, .. } => write!(f, "room {room_id}"),
        }
    }
}

/// Member list attached to join/leave notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct Members {
    #[serde(default)]
    pub members: Vec<Source>,
}

impl Members {
    /// Comma-joined user IDs, for acknowledgement replies.
    #[must_use]
    pub fn user_ids(&self) -> String {
        self.members
            .iter()
            .filter_map(Source::user_id)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    #[serde(default)]
    pub data: String,
    /// Datetime picker results keyed by mode (`date`, `time`, `datetime`).
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconContent {
    pub hwid: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlayCompleteContent {
    pub tracking_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsendContent {
    pub message_id: String,
}

/// Payload of a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text { id: String, text: String },
    #[serde(rename_all = "camelCase")]
    Sticker {
        id: String,
        package_id: String,
        sticker_id: String,
    },
    Location {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        id: String,
        content_provider: ContentProvider,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        id: String,
        /// Length in milliseconds.
        #[serde(default)]
        duration: u64,
        content_provider: ContentProvider,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        id: String,
        content_provider: ContentProvider,
    },
    #[serde(rename_all = "camelCase")]
    File {
        id: String,
        file_name: String,
        file_size: u64,
    },
    /// Message kind this bot does not handle.
    #[serde(other)]
    Unknown,
}

/// Who hosts the binary payload of a media message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentProvider {
    /// Hosted by the platform, fetched through the blob endpoint.
    Line,
    /// Hosted elsewhere, URLs usable as-is.
    #[serde(rename_all = "camelCase")]
    External {
        original_content_url: String,
        #[serde(default)]
        preview_image_url: Option<String>,
    },
}
