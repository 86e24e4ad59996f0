//! Webhook HTTP server.
//!
//! Lifecycle:
//! 1. Verify the platform signature over the raw delivery body
//! 2. Decode the envelope into typed events
//! 3. Hand each event to the dispatcher, logging per-event failures
//! 4. Acknowledge the delivery with 200 so the platform never redelivers
//!
//! Materialized media and shipped profile images are served from disk
//! under `/downloaded` and `/static`.

pub mod server;

pub use server::{AppState, build_app, serve};
