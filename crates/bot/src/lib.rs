//! Webhook bot core: command table, reply policy and inbound media
//! handling.
//!
//! [`Dispatcher`] turns each decoded webhook event into at most one
//! reply batch, sent through a [`ReplyGateway`].

pub mod commands;
pub mod content;
pub mod error;
pub mod handlers;
pub mod outbound;

pub use {
    content::LineContentFetcher,
    error::{Error, Result},
    handlers::Dispatcher,
    outbound::{MAX_TEXT_CHARS, Replier, ReplyGateway},
};
