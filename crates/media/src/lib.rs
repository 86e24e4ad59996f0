//! Content pipeline: fetch platform-hosted blobs, store them under public
//! URLs, derive previews with external tools.

pub mod error;
pub mod fetch;
pub mod materialize;
pub mod store;
pub mod transform;

pub use {
    error::{Error, Result},
    fetch::ContentFetcher,
    materialize::{MaterializedContent, Materializer, MediaSource},
    store::{ContentStore, StoredFile},
    transform::{CommandTransformer, Transformer},
};
