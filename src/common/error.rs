use thiserror::Error;

/// Errors surfaced by the public API.
///
/// Read paths report "not found" and transport failures alike as `None` or an empty
/// `Vec`, and write paths as `false`. This type only covers what must be rejected
/// before any request is made.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument failed validation; no network call was issued.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Transport(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn blank(name: &'static str) -> Self {
        Error::InvalidArgument {
            name,
            reason: "must not be blank",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
