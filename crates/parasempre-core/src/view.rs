// ── Directory view model ──
//
// Pure derivations over the cached collection: filtering, attendance
// stats, family grouping, and the selection set. Nothing here touches
// the network or the cache.

use std::collections::HashSet;

use crate::model::{Guest, GuestId, Side};

// ── Filter ──────────────────────────────────────────────────────────

/// Composable filter over the collection. The three criteria combine
/// by conjunction; an unset criterion passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring of the full name, or plain substring
    /// of the phone digits.
    pub search: String,
    pub side: Option<Side>,
    pub confirmed: Option<bool>,
}

impl DirectoryFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.side.is_none() && self.confirmed.is_none()
    }

    /// Whether a guest passes every active criterion.
    pub fn matches(&self, guest: &Guest) -> bool {
        self.matches_search(guest)
            && self.side.is_none_or(|side| side == guest.side)
            && self.confirmed.is_none_or(|confirmed| confirmed == guest.confirmed)
    }

    fn matches_search(&self, guest: &Guest) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        // Name matching folds case; phone matching is a raw substring
        // of the stored digits.
        guest.full_name().to_lowercase().contains(&needle)
            || guest
                .phone
                .as_ref()
                .is_some_and(|phone| phone.as_digits().contains(&self.search))
    }
}

// ── View ────────────────────────────────────────────────────────────

/// Filtered projection that keeps "the directory is empty" apart from
/// "the filter matched nothing", so callers can word the two cases
/// differently.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryView {
    Empty,
    NoMatches,
    Rows(Vec<Guest>),
}

impl DirectoryView {
    /// Project the collection through a filter, preserving order.
    pub fn build(guests: &[Guest], filter: &DirectoryFilter) -> Self {
        if guests.is_empty() {
            return Self::Empty;
        }
        let rows: Vec<Guest> = guests.iter().filter(|g| filter.matches(g)).cloned().collect();
        if rows.is_empty() {
            Self::NoMatches
        } else {
            Self::Rows(rows)
        }
    }
}

// ── Stats ───────────────────────────────────────────────────────────

/// Attendance counters, always over the unfiltered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
}

impl DirectoryStats {
    pub fn tally(guests: &[Guest]) -> Self {
        let confirmed = guests.iter().filter(|g| g.confirmed).count();
        Self { total: guests.len(), confirmed, pending: guests.len() - confirmed }
    }
}

// ── Family grouping ─────────────────────────────────────────────────

/// Everyone sharing a family group, except the subject.
pub fn family_members(guests: &[Guest], family_group: i64, exclude: Option<GuestId>) -> Vec<Guest> {
    guests
        .iter()
        .filter(|g| g.family_group == family_group && exclude != Some(g.id))
        .cloned()
        .collect()
}

// ── Selection ───────────────────────────────────────────────────────

/// Set of guest ids marked for a bulk operation, tied to the filter it
/// was made under. Changing the filter clears the set, so selected ids
/// never silently reference rows that dropped out of view.
#[derive(Debug, Default)]
pub struct Selection {
    ids: HashSet<GuestId>,
    filter: DirectoryFilter,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a filter. A filter equal to the current one keeps the
    /// selection; anything else clears it.
    pub fn set_filter(&mut self, filter: DirectoryFilter) {
        if self.filter != filter {
            self.ids.clear();
            self.filter = filter;
        }
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn toggle(&mut self, id: GuestId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn select_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a Guest>) {
        self.ids.extend(rows.into_iter().map(|g| g.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: GuestId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order, ready for a bulk delete.
    pub fn ids(&self) -> Vec<GuestId> {
        let mut ids: Vec<GuestId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
