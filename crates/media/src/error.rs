#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Binary payload could not be retrieved from its host.
    #[error("content fetch failed: {message}")]
    Fetch { message: String },

    /// Local filesystem operation failed.
    #[error("content store failed: {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// External transform tool failed, timed out or could not start.
    #[error("transform failed: {message}")]
    Transform { message: String },
}

impl Error {
    #[must_use]
    pub fn fetch(message: impl std::fmt::Display) -> Self {
        Self::Fetch {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    #[must_use]
    pub fn transform(message: impl std::fmt::Display) -> Self {
        Self::Transform {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
