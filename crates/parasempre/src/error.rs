//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use parasempre_config::ConfigError;
use parasempre_core::CoreError;

/// Exit codes, stable for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Identity ─────────────────────────────────────────────────────

    #[error("Identificação (RACF) não configurada")]
    #[diagnostic(
        code(parasempre::identity_required),
        help("Configure com: parasempre identity set <RACF>")
    )]
    IdentityRequired,

    // ── Validation ───────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(parasempre::validation))]
    Validation { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(parasempre::not_found),
        help("Liste os convidados com: parasempre guests list")
    )]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(parasempre::conflict))]
    Conflict { message: String },

    // ── Transport ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(parasempre::transport),
        help("Verifique se o serviço está acessível na URL configurada (--api-base).")
    )]
    Transport {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(parasempre::config))]
    Config { field: String, reason: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::IdentityRequired => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Transport { status: None, .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::IdentityRequired => Self::IdentityRequired,

            CoreError::Validation { message } => Self::Validation { message },

            CoreError::NotFound { message } => Self::NotFound { message },

            CoreError::Conflict { message } => Self::Conflict { message },

            CoreError::Transport { message, status } => Self::Transport { message, status },

            CoreError::Io { message } => Self::Io(std::io::Error::other(message)),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Config { field, reason },
            ConfigError::Io(source) => Self::Io(source),
            ConfigError::Serialization(source) => Self::Config {
                field: "settings".into(),
                reason: source.to_string(),
            },
            ConfigError::Figment(source) => Self::Config {
                field: "settings".into(),
                reason: source.to_string(),
            },
        }
    }
}
