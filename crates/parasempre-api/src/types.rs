// Wire types for the guest-directory API.
//
// These mirror the JSON bodies exactly (snake_case, server field set).
// Domain-level validation and strong typing happen in `parasempre-core`;
// this layer only guarantees shape.

use serde::{Deserialize, Serialize};

/// A guest row as returned by `GET /api/guests` and the mutation endpoints.
///
/// Timestamps stay raw RFC 3339 strings here; the core crate parses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Digits-only string or null. Some server variants send `""` for absent.
    pub phone: Option<String>,
    /// `"P"` (groom's side) or `"R"` (bride's side).
    pub relationship: String,
    pub confirmed: bool,
    pub family_group: i64,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for `POST /api/guests`.
///
/// `phone` is always present (empty string when the guest has none) to match
/// what the reference frontend sends. `family_group` is omitted entirely when
/// unset so the server assigns the next free group.
#[derive(Debug, Clone, Serialize)]
pub struct NewGuestBody {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub relationship: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_group: Option<i64>,
}

/// Body for `PUT /api/guests/{id}`. Absent fields are left unchanged
/// server-side, so `None` fields must not appear in the JSON at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GuestPatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_group: Option<i64>,
}

/// Body for the bulk `DELETE /api/guests` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<i64>,
}

/// Outcome of `POST /api/guests/import`.
///
/// The server answers with this shape on full success (200) and on partial
/// failure (400 with per-row errors); both parse here. `errors` may be JSON
/// null when every row committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResultBody {
    pub imported: u32,
    pub total: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

/// Accept an absent field, JSON null, or a list, normalizing to a `Vec`.
fn null_as_empty<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let errors = Option::<Vec<String>>::deserialize(de)?;
    Ok(errors.unwrap_or_default())
}

/// Role payload from `GET /api/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleBody {
    pub role: String,
}

/// A row from `GET /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub uracf: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
}
