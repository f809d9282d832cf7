// ── Domain model ──

pub mod guest;
pub mod import;
pub mod user;

pub use guest::{Guest, GuestId, GuestPatch, NewGuest, Phone, Side};
pub use import::ImportReport;
pub use user::{Racf, Role, UserSummary};
