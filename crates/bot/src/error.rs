/// Errors produced while handling a webhook event.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reply rejected locally, before reaching the platform.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Platform API call failed.
    #[error(transparent)]
    Line(#[from] meishi_line::Error),

    /// Inbound media could not be fetched or stored.
    #[error(transparent)]
    Media(#[from] meishi_media::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
