// Core error type shared by the directory, cache, and identity layers.
//
// Every variant carries owned data only, so results can be cloned and
// broadcast to concurrent waiters of a coalesced fetch.

use thiserror::Error;

/// Errors surfaced by the guest-directory core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input rejected before any network traffic.
    #[error("{message}")]
    Validation { message: String },

    /// A mutating operation was attempted with no identity configured.
    #[error("Identificação (RACF) não configurada")]
    IdentityRequired,

    /// The server reported the record as absent (HTTP 404).
    #[error("{message}")]
    NotFound { message: String },

    /// The server rejected the write as a duplicate (HTTP 409).
    #[error("{message}")]
    Conflict { message: String },

    /// Transport failure, non-2xx response, or a schema-invalid body.
    #[error("{message}")]
    Transport {
        message: String,
        /// HTTP status, when the failure carried one.
        status: Option<u16>,
    },

    /// Local I/O failure (identity persistence, import file read).
    #[error("{message}")]
    Io { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), status: None }
    }

    /// True for 404-mapped errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for client-side rejections that never reached the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::IdentityRequired)
    }
}

impl From<parasempre_api::Error> for CoreError {
    fn from(err: parasempre_api::Error) -> Self {
        match err {
            parasempre_api::Error::Api { status: 404, message } => Self::NotFound { message },
            parasempre_api::Error::Api { status: 409, message } => Self::Conflict { message },
            parasempre_api::Error::Api { status, message } => {
                Self::Transport { message, status: Some(status) }
            }
            parasempre_api::Error::Transport(source) => Self::Transport {
                message: source.to_string(),
                status: source.status().map(|s| s.as_u16()),
            },
            parasempre_api::Error::Deserialization { message, .. } => Self::Transport {
                message: format!("resposta inválida do servidor: {message}"),
                status: None,
            },
            parasempre_api::Error::InvalidUrl(source) => Self::Transport {
                message: format!("URL inválida: {source}"),
                status: None,
            },
        }
    }
}
