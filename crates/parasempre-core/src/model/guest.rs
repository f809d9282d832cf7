// ── Guest domain types ──
//
// GuestId, Side, and Phone form the foundation of the directory model.
// Phone normalizes user input at the boundary so every stored value is
// digits-only; Side pins the single-letter wire encoding in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ── GuestId ─────────────────────────────────────────────────────────

/// Server-assigned numeric identifier, immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(i64);

impl GuestId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GuestId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for GuestId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

// ── Side ────────────────────────────────────────────────────────────

/// Which half of the couple invited the guest.
///
/// The wire encoding is a single letter: `"P"` for the groom's side,
/// `"R"` for the bride's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Side {
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Groom,
    #[serde(rename = "R")]
    #[strum(serialize = "R")]
    Bride,
}

impl Side {
    pub(crate) fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "P" => Some(Self::Groom),
            "R" => Some(Self::Bride),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Groom => "P",
            Self::Bride => "R",
        }
    }

    /// Human-readable label for tables and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Groom => "Noivo",
            Self::Bride => "Noiva",
        }
    }
}

// ── Phone ───────────────────────────────────────────────────────────

/// Brazilian mobile number, stored as exactly 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Normalize free-form input: every non-digit is stripped before
    /// validation. Input that is empty after stripping means "no phone"
    /// and yields `None`; anything else must come out to 11 digits.
    pub fn parse(raw: &str) -> Result<Option<Self>, CoreError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Ok(None);
        }
        if digits.len() != 11 {
            return Err(CoreError::validation("Telefone deve ter 11 dígitos."));
        }
        Ok(Some(Self(digits)))
    }

    pub fn as_digits(&self) -> &str {
        &self.0
    }

    /// Render as `(dd) ddddd-dddd`.
    pub fn formatted(&self) -> String {
        format!("({}) {}-{}", &self.0[..2], &self.0[2..7], &self.0[7..])
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

// ── Guest ───────────────────────────────────────────────────────────

/// One directory entry as the server last reported it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<Phone>,
    pub side: Side,
    pub confirmed: bool,
    /// Household tag shared by guests invited together. Always positive.
    pub family_group: i64,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// `"First Last"`, the form search matches against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ── NewGuest ────────────────────────────────────────────────────────

/// Input for guest creation. The server assigns the id, audit fields,
/// and timestamps; new guests always start unconfirmed.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<Phone>,
    pub side: Side,
    /// `None` lets the server pick the next free household tag.
    pub family_group: Option<i64>,
}

impl NewGuest {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.first_name.trim().is_empty() {
            return Err(CoreError::validation("o nome é obrigatório"));
        }
        if self.last_name.trim().is_empty() {
            return Err(CoreError::validation("o sobrenome é obrigatório"));
        }
        if let Some(group) = self.family_group {
            if group <= 0 {
                return Err(CoreError::validation("grupo familiar deve ser maior que zero"));
            }
        }
        Ok(())
    }
}

// ── GuestPatch ──────────────────────────────────────────────────────

/// Partial update. `None` fields are left unchanged on the server.
///
/// `phone` distinguishes three intents: `None` leaves the number alone,
/// `Some(None)` clears it, `Some(Some(p))` replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<Phone>>,
    pub side: Option<Side>,
    pub confirmed: Option<bool>,
    pub family_group: Option<i64>,
}

impl GuestPatch {
    /// A patch that only flips the confirmation flag.
    pub fn confirmation(confirmed: bool) -> Self {
        Self { confirmed: Some(confirmed), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.side.is_none()
            && self.confirmed.is_none()
            && self.family_group.is_none()
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::validation("Pelo menos um campo deve ser enviado."));
        }
        if self.first_name.as_ref().is_some_and(|name| name.trim().is_empty()) {
            return Err(CoreError::validation("o nome é obrigatório"));
        }
        if self.last_name.as_ref().is_some_and(|name| name.trim().is_empty()) {
            return Err(CoreError::validation("o sobrenome é obrigatório"));
        }
        if self.family_group.is_some_and(|group| group <= 0) {
            return Err(CoreError::validation("grupo familiar deve ser maior que zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn phone_strips_formatting() {
        let phone = Phone::parse("(11) 99999-0001").unwrap().unwrap();
        assert_eq!(phone.as_digits(), "11999990001");
    }

    #[test]
    fn phone_empty_input_means_absent() {
        assert_eq!(Phone::parse("").unwrap(), None);
        assert_eq!(Phone::parse("  ( ) -").unwrap(), None);
    }

    #[test]
    fn phone_rejects_wrong_length() {
        let err = Phone::parse("9999-0001").unwrap_err();
        assert_eq!(err.to_string(), "Telefone deve ter 11 dígitos.");
    }

    #[test]
    fn phone_formats_for_display() {
        let phone = Phone::parse("11999990001").unwrap().unwrap();
        assert_eq!(phone.formatted(), "(11) 99999-0001");
    }

    #[test]
    fn side_wire_round_trip() {
        assert_eq!(Side::from_wire("P"), Some(Side::Groom));
        assert_eq!(Side::from_wire("R"), Some(Side::Bride));
        assert_eq!(Side::from_wire("X"), None);
        assert_eq!(Side::Groom.as_wire(), "P");
    }

    #[test]
    fn new_guest_requires_names() {
        let input = NewGuest {
            first_name: "   ".to_owned(),
            last_name: "Silva".to_owned(),
            phone: None,
            side: Side::Groom,
            family_group: None,
        };
        assert_eq!(input.validate().unwrap_err().to_string(), "o nome é obrigatório");
    }

    #[test]
    fn new_guest_rejects_non_positive_family_group() {
        let input = NewGuest {
            first_name: "Ana".to_owned(),
            last_name: "Silva".to_owned(),
            phone: None,
            side: Side::Bride,
            family_group: Some(0),
        };
        assert_eq!(
            input.validate().unwrap_err().to_string(),
            "grupo familiar deve ser maior que zero"
        );
    }

    #[test]
    fn empty_patch_is_rejected() {
        let err = GuestPatch::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "Pelo menos um campo deve ser enviado.");
    }

    #[test]
    fn confirmation_patch_is_not_empty() {
        let patch = GuestPatch::confirmation(true);
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn guest_id_parses_from_str() {
        let id: GuestId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
    }
}
