//! Synchronized client-side layer between `parasempre-api` and UI consumers.
//!
//! This crate owns the domain model, caching discipline, and business
//! rules of the parasempre guest directory:
//!
//! - **[`GuestDirectory`]** — Central facade over the HTTP repository.
//!   Reads go through a single-flight, read-through cache; mutations
//!   validate locally, attach the caller's identity, and apply the
//!   invalidation rules only after the server confirms.
//!
//! - **[`IdentityContext`]** — Process-wide RACF identity: validated at
//!   the boundary, persisted through a pluggable [`IdentityStore`], and
//!   broadcast over a `watch` channel. Resolves the caller's [`Role`]
//!   with a short-lived cache.
//!
//! - **[`ImportSession`]** — One-at-a-time spreadsheet import state
//!   machine (`Idle → FileSelected → Uploading → Completed | Failed`).
//!
//! - **View model** ([`view`]) — Pure derivations over the cached
//!   collection: [`DirectoryFilter`], [`DirectoryView`],
//!   [`DirectoryStats`], family grouping, and the [`Selection`] set.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Guest`, `Side`,
//!   `Phone`, `Racf`, `Role`) with validation at construction, so
//!   malformed values never circulate.

pub mod convert;
pub mod directory;
pub mod error;
pub mod identity;
pub mod import;
pub mod model;
pub mod view;

mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use directory::GuestDirectory;
pub use error::CoreError;
pub use identity::{IdentityContext, IdentityStore, MemoryIdentityStore};
pub use import::{ImportSession, ImportState};
pub use view::{DirectoryFilter, DirectoryStats, DirectoryView, Selection};

// Re-export model types at the crate root for ergonomics.
pub use model::{Guest, GuestId, GuestPatch, ImportReport, NewGuest, Phone, Racf, Role, Side, UserSummary};
