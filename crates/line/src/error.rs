use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input violates the reply API contract before any request is made.
    #[error("invalid reply input: {message}")]
    InvalidInput { message: String },

    /// The platform accepted the request but answered with an error status.
    #[error("line api returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
