// ── Guest directory ──
//
// The one entry point consumers talk to. Owns the HTTP client, the
// synchronization caches, and the identity context, and applies the
// invalidation rules around every operation:
//
//   create        → invalidate collection
//   update        → write response through detail slot, invalidate collection
//   delete        → drop detail slot(s), invalidate collection
//   import        → invalidate collection only when rows committed
//
// Invalidation happens strictly after a successful response; a failed
// mutation leaves every cached value untouched.

use std::sync::Arc;

use tracing::{debug, info, warn};

use parasempre_api::DirectoryClient;

use crate::convert;
use crate::error::CoreError;
use crate::identity::IdentityContext;
use crate::model::{Guest, GuestId, GuestPatch, ImportReport, NewGuest, Role, UserSummary};
use crate::store::SyncCache;

/// Logical address of the full-collection cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AllGuests;

/// Handle over shared directory state. Cheap to clone; all clones see
/// the same cache.
#[derive(Clone)]
pub struct GuestDirectory {
    inner: Arc<DirectoryInner>,
}

struct DirectoryInner {
    client: DirectoryClient,
    identity: IdentityContext,
    listing: SyncCache<AllGuests, Vec<Guest>>,
    details: SyncCache<GuestId, Guest>,
}

impl GuestDirectory {
    pub fn new(client: DirectoryClient, identity: IdentityContext) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                client,
                identity,
                listing: SyncCache::new(),
                details: SyncCache::new(),
            }),
        }
    }

    pub fn identity(&self) -> &IdentityContext {
        &self.inner.identity
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The full guest collection, in server order. Served from cache
    /// when fresh; concurrent callers share a single fetch.
    pub async fn guests(&self) -> Result<Arc<Vec<Guest>>, CoreError> {
        self.inner
            .listing
            .read_through(AllGuests, || async move {
                debug!("fetching guest collection");
                let records = self.inner.client.list_guests().await.map_err(CoreError::from)?;
                records.into_iter().map(Guest::try_from).collect::<Result<Vec<_>, _>>()
            })
            .await
    }

    /// One guest by id.
    pub async fn guest(&self, id: GuestId) -> Result<Arc<Guest>, CoreError> {
        self.inner
            .details
            .read_through(id, || async move {
                debug!(%id, "fetching guest");
                let record = self.inner.client.get_guest(id.value()).await.map_err(CoreError::from)?;
                Guest::try_from(record)
            })
            .await
    }

    /// Force the next `guests()` to hit the network, then read through.
    pub async fn refresh(&self) -> Result<Arc<Vec<Guest>>, CoreError> {
        self.inner.listing.invalidate(&AllGuests);
        self.guests().await
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a guest. Input is validated before any network traffic.
    pub async fn create(&self, input: &NewGuest) -> Result<Guest, CoreError> {
        input.validate()?;
        let racf = self.inner.identity.require()?;
        let body = convert::new_guest_body(input);

        let record = self
            .inner
            .client
            .create_guest(racf.as_str(), &body)
            .await
            .map_err(CoreError::from)?;
        let guest = Guest::try_from(record)?;

        info!(id = %guest.id, "guest created");
        self.inner.listing.invalidate(&AllGuests);
        Ok(guest)
    }

    /// Apply a partial update. An empty patch is rejected locally; the
    /// server's response is written through to the detail slot.
    pub async fn update(&self, id: GuestId, patch: &GuestPatch) -> Result<Guest, CoreError> {
        patch.validate()?;
        let racf = self.inner.identity.require()?;
        let body = convert::guest_patch_body(patch);

        let record = self
            .inner
            .client
            .update_guest(racf.as_str(), id.value(), &body)
            .await
            .map_err(CoreError::from)?;
        let guest = Guest::try_from(record)?;

        info!(id = %guest.id, "guest updated");
        self.inner.details.write_through(id, guest.clone());
        self.inner.listing.invalidate(&AllGuests);
        Ok(guest)
    }

    /// Delete one guest.
    pub async fn delete(&self, id: GuestId) -> Result<(), CoreError> {
        let racf = self.inner.identity.require()?;
        self.inner
            .client
            .delete_guest(racf.as_str(), id.value())
            .await
            .map_err(CoreError::from)?;

        info!(%id, "guest deleted");
        self.inner.details.remove(&id);
        self.inner.listing.invalidate(&AllGuests);
        Ok(())
    }

    /// Delete several guests in one round trip, all-or-nothing. An
    /// empty id set is rejected locally.
    pub async fn delete_many(&self, ids: &[GuestId]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Err(CoreError::validation("nenhum convidado selecionado"));
        }
        let racf = self.inner.identity.require()?;
        let raw: Vec<i64> = ids.iter().map(|id| id.value()).collect();
        self.inner
            .client
            .delete_guests(racf.as_str(), &raw)
            .await
            .map_err(CoreError::from)?;

        info!(count = ids.len(), "guests deleted");
        for id in ids {
            self.inner.details.remove(id);
        }
        self.inner.listing.invalidate(&AllGuests);
        Ok(())
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Upload a spreadsheet and return the server's row-by-row report.
    ///
    /// Upload failures don't error out: they come back as a report with
    /// zero counts and the failure message, so callers have a single
    /// result channel either way. The collection is refetched only when
    /// at least one row actually committed.
    pub async fn import(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<ImportReport, CoreError> {
        let racf = self.inner.identity.require()?;

        let report = match self
            .inner
            .client
            .import_guests(racf.as_str(), file_name, contents)
            .await
        {
            Ok(body) => ImportReport::from(body),
            Err(err) => {
                let core = CoreError::from(err);
                warn!(error = %core, "import upload failed");
                ImportReport::from_transport_failure(&core)
            }
        };

        if report.imported > 0 {
            self.inner.listing.invalidate(&AllGuests);
        }
        Ok(report)
    }

    // ── Identity / users ─────────────────────────────────────────────

    /// The current identity's role, resolved through the identity
    /// context's short-lived cache.
    pub async fn role(&self) -> Result<Role, CoreError> {
        self.inner.identity.role(&self.inner.client).await
    }

    /// Every registered user. Not cached; the listing is small and
    /// rarely consulted.
    pub async fn users(&self) -> Result<Vec<UserSummary>, CoreError> {
        let records = self.inner.client.list_users().await.map_err(CoreError::from)?;
        records.into_iter().map(UserSummary::try_from).collect()
    }
}
