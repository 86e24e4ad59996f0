//! LINE Messaging API wire layer for meishi.
//!
//! Decodes signed webhook envelopes into typed events, encodes reply
//! messages, and talks to the reply and content endpoints.

pub mod client;
pub mod error;
pub mod events;
pub mod messages;
pub mod signature;

pub use {
    client::{LineClient, MAX_REPLY_MESSAGES},
    error::{Error, Result},
    events::{
        BeaconContent, ContentProvider, InboundEvent, Members, MessageContent, PostbackContent,
        Source, UnsendContent, VideoPlayCompleteContent, WebhookEnvelope, parse_envelope,
    },
    messages::{Action, ImageCarouselColumn, OutboundMessage, Template},
    signature::{SIGNATURE_HEADER, verify_signature},
};
