use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes surfaced by the data layer. Every message is meant to be
/// shown to a person as-is; there are no error codes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No user is currently logged in")]
    NotLoggedIn,

    /// The value stored under a key exists but no longer parses. A missing
    /// key is not an error (it reads as an empty collection); this variant
    /// keeps actual corruption distinguishable from "never initialized".
    #[error("Stored data under `{key}` is corrupt: {source}")]
    CorruptData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
