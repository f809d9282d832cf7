// ── API-to-domain type conversions ──
//
// Bridges raw `parasempre_api` response types into canonical
// `parasempre_core::model` domain types, and builds request bodies from
// domain inputs. Responses are held to the domain invariants: a record
// that violates them is reported as a transport-level failure rather
// than leaking into the cache.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use parasempre_api::types::{
    GuestPatchBody, GuestRecord, ImportResultBody, NewGuestBody, UserRecord,
};

use crate::error::CoreError;
use crate::model::{Guest, GuestId, GuestPatch, ImportReport, NewGuest, Phone, Racf, Role, Side, UserSummary};

// ── Helpers ────────────────────────────────────────────────────────

fn invalid(field: &str, detail: impl Display) -> CoreError {
    CoreError::invalid_response(format!("campo inválido na resposta do servidor: {field} ({detail})"))
}

/// Parse an RFC 3339 timestamp as the server emits them.
fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| invalid(field, err))
}

/// Stored phones are digits-only and exactly 11 long; an empty string
/// means "no phone".
fn parse_stored_phone(raw: Option<&str>) -> Result<Option<Phone>, CoreError> {
    match raw {
        None | Some("") => Ok(None),
        Some(digits) => {
            if digits.len() == 11 && digits.chars().all(|c| c.is_ascii_digit()) {
                // Already normalized; Phone::parse is a no-op strip here.
                Phone::parse(digits).map_err(|err| invalid("phone", err))
            } else {
                Err(invalid("phone", digits))
            }
        }
    }
}

pub(crate) fn role_from_wire(raw: &str) -> Result<Role, CoreError> {
    raw.parse::<Role>().map_err(|_| invalid("role", raw))
}

// ── Guest ───────────────────────────────────────────────────────────

impl TryFrom<GuestRecord> for Guest {
    type Error = CoreError;

    fn try_from(record: GuestRecord) -> Result<Self, Self::Error> {
        if record.first_name.trim().is_empty() {
            return Err(invalid("first_name", "vazio"));
        }
        if record.last_name.trim().is_empty() {
            return Err(invalid("last_name", "vazio"));
        }
        let side = Side::from_wire(&record.relationship)
            .ok_or_else(|| invalid("relationship", &record.relationship))?;
        if record.family_group <= 0 {
            return Err(invalid("family_group", record.family_group));
        }

        Ok(Self {
            id: GuestId::new(record.id),
            first_name: record.first_name,
            last_name: record.last_name,
            phone: parse_stored_phone(record.phone.as_deref())?,
            side,
            confirmed: record.confirmed,
            family_group: record.family_group,
            created_by: record.created_by,
            updated_by: record.updated_by,
            created_at: parse_timestamp("created_at", &record.created_at)?,
            updated_at: parse_timestamp("updated_at", &record.updated_at)?,
        })
    }
}

// ── Users ───────────────────────────────────────────────────────────

impl TryFrom<UserRecord> for UserSummary {
    type Error = CoreError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            racf: Racf::parse(&record.uracf).map_err(|err| invalid("uracf", err))?,
            role: role_from_wire(&record.role)?,
            first_name: record.first_name,
            last_name: record.last_name,
        })
    }
}

// ── Import ──────────────────────────────────────────────────────────

impl From<ImportResultBody> for ImportReport {
    fn from(body: ImportResultBody) -> Self {
        Self { imported: body.imported, total: body.total, errors: body.errors }
    }
}

// ── Request bodies ──────────────────────────────────────────────────

pub(crate) fn new_guest_body(input: &NewGuest) -> NewGuestBody {
    NewGuestBody {
        first_name: input.first_name.trim().to_owned(),
        last_name: input.last_name.trim().to_owned(),
        phone: input
            .phone
            .as_ref()
            .map_or_else(String::new, |p| p.as_digits().to_owned()),
        relationship: input.side.as_wire().to_owned(),
        family_group: input.family_group,
    }
}

pub(crate) fn guest_patch_body(patch: &GuestPatch) -> GuestPatchBody {
    GuestPatchBody {
        first_name: patch.first_name.as_ref().map(|name| name.trim().to_owned()),
        last_name: patch.last_name.as_ref().map(|name| name.trim().to_owned()),
        phone: patch
            .phone
            .as_ref()
            .map(|p| p.as_ref().map_or_else(String::new, |p| p.as_digits().to_owned())),
        relationship: patch.side.map(|side| side.as_wire().to_owned()),
        confirmed: patch.confirmed,
        family_group: patch.family_group,
    }
}
