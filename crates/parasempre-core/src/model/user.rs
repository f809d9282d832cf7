// ── Identity and role types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── Racf ────────────────────────────────────────────────────────────

/// Corporate identity token: exactly five alphanumeric ASCII characters,
/// normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Racf(String);

impl Racf {
    /// Validate and normalize a token. Surrounding whitespace is ignored;
    /// the stored form is always uppercase.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(CoreError::validation(
                "RACF deve ter exatamente 5 caracteres alfanuméricos",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Racf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Racf {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Racf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Role ────────────────────────────────────────────────────────────

/// Resolved role of an identity. Hosts (groom and bride) manage the
/// directory; plain guests only browse it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Groom,
    Bride,
    Guest,
}

impl Role {
    pub fn is_host(self) -> bool {
        matches!(self, Self::Groom | Self::Bride)
    }

    /// Human-readable label for tables and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Groom => "Noivo",
            Self::Bride => "Noiva",
            Self::Guest => "Convidado",
        }
    }
}

// ── UserSummary ─────────────────────────────────────────────────────

/// One row of the registered-user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub racf: Racf,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl UserSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
