//! Unified error type for tremor-templates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while generating templates or viewing stored images.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials were rejected or the storage service could not be reached
    /// when the session was opened.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested object does not exist.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// A network-level failure while talking to the storage service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Downloaded bytes are not an image format the decoder understands.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rasterising or encoding an image failed.
    #[error("Render error: {0}")]
    Render(String),

    /// No access key configured for the storage service.
    #[error("No storage access key. Set {env_var} or add it to the config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Coarse error category, stable enough to be written to cassettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`Error::Authentication`].
    Authentication,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::Transport`].
    Transport,
    /// See [`Error::Decode`].
    Decode,
    /// Anything else; fatal for the current command.
    Other,
}

impl Error {
    /// The category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            _ => ErrorKind::Other,
        }
    }

    /// The message without the category prefix added by `Display`.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Authentication(m)
            | Self::NotFound(m)
            | Self::Transport(m)
            | Self::Decode(m)
            | Self::Config(m)
            | Self::InvalidArgument(m)
            | Self::Render(m) => m.clone(),
            Self::Io(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Rebuild an error from its recorded kind and message.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Authentication => Self::Authentication(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Transport => Self::Transport(message),
            ErrorKind::Decode => Self::Decode(message),
            ErrorKind::Other => Self::Config(message),
        }
    }

    /// Stable name of the concrete variant, recorded next to the kind so a
    /// replay can tell apart the errors that share [`ErrorKind::Other`].
    #[must_use]
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "authentication",
            Self::NotFound(_) => "not_found",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Render(_) => "render",
            Self::MissingApiKey { .. } => "missing_api_key",
        }
    }

    /// Rebuild a recorded error. `variant` refines [`ErrorKind::Other`];
    /// without it (or for an unknown name) the error comes back as
    /// [`Error::Config`].
    #[must_use]
    pub fn from_recorded(
        kind: ErrorKind,
        variant: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        if kind != ErrorKind::Other {
            return Self::from_kind(kind, message);
        }
        match variant {
            Some("io") => Self::Io(std::io::Error::other(message)),
            Some("invalid_argument") => Self::InvalidArgument(message),
            Some("render") => Self::Render(message),
            _ => Self::Config(message),
        }
    }

    /// Whether a retry has any chance of succeeding.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
