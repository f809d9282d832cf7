// ── Identity context ──
//
// Process-wide RACF identity: validated at the boundary, persisted
// through a pluggable store, and broadcast to observers over a `watch`
// channel. Carries a short-lived cache of the resolved role so repeated
// permission checks don't hammer the server.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::debug;

use parasempre_api::DirectoryClient;

use crate::convert;
use crate::error::CoreError;
use crate::model::{Racf, Role};

/// How long a resolved role stays fresh before the next remote lookup.
const ROLE_TTL: Duration = Duration::from_secs(5 * 60);

/// Persistence seam for the identity token.
///
/// The config crate ships the file-backed implementation; tests and
/// ephemeral sessions use [`MemoryIdentityStore`].
pub trait IdentityStore: Send + Sync {
    /// Read the persisted token; `None` when unset.
    fn load(&self) -> std::io::Result<Option<String>>;
    fn save(&self, token: &str) -> std::io::Result<()>;
    fn clear(&self) -> std::io::Result<()>;
}

/// In-memory store, never touching disk.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    token: Mutex<Option<String>>,
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> std::io::Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> std::io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// A role resolution, valid for [`ROLE_TTL`] and only for the identity
/// it was resolved against.
struct ResolvedRole {
    racf: Racf,
    role: Role,
    resolved_at: Instant,
}

/// Shared identity state. Cheap to clone; all clones observe the same
/// token and role cache.
#[derive(Clone)]
pub struct IdentityContext {
    inner: Arc<IdentityInner>,
}

struct IdentityInner {
    store: Box<dyn IdentityStore>,
    current: watch::Sender<Option<Racf>>,
    resolved: Mutex<Option<ResolvedRole>>,
}

impl IdentityContext {
    /// Initialize from the store. A malformed persisted token is treated
    /// as unset rather than failing startup.
    pub fn new(store: Box<dyn IdentityStore>) -> Result<Self, CoreError> {
        let initial = store
            .load()
            .map_err(io_error)?
            .and_then(|raw| Racf::parse(&raw).ok());
        let (current, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(IdentityInner { store, current, resolved: Mutex::new(None) }),
        })
    }

    /// The current identity; `None` when unset.
    pub fn current(&self) -> Option<Racf> {
        self.inner.current.borrow().clone()
    }

    /// The current identity, or the fail-fast error every mutation uses.
    pub(crate) fn require(&self) -> Result<Racf, CoreError> {
        self.current().ok_or(CoreError::IdentityRequired)
    }

    /// Validate, persist, and broadcast a new identity token.
    pub fn set(&self, raw: &str) -> Result<Racf, CoreError> {
        let racf = Racf::parse(raw)?;
        self.inner.store.save(racf.as_str()).map_err(io_error)?;
        self.inner.current.send_replace(Some(racf.clone()));
        debug!(%racf, "identity set");
        Ok(racf)
    }

    /// Remove the persisted identity and broadcast the change.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.inner.store.clear().map_err(io_error)?;
        self.inner.current.send_replace(None);
        debug!("identity cleared");
        Ok(())
    }

    /// Observe identity changes. The receiver's current value is the
    /// identity at subscription time.
    pub fn subscribe(&self) -> watch::Receiver<Option<Racf>> {
        self.inner.current.subscribe()
    }

    /// Resolve the current identity's role, consulting the server at
    /// most once per [`ROLE_TTL`] per identity. Cached resolutions for
    /// a different token never leak across an identity switch.
    pub async fn role(&self, client: &DirectoryClient) -> Result<Role, CoreError> {
        let racf = self.require()?;

        if let Some(role) = self.cached_role(&racf) {
            return Ok(role);
        }

        let body = client.fetch_me(racf.as_str()).await.map_err(CoreError::from)?;
        let role = convert::role_from_wire(&body.role)?;
        debug!(%racf, %role, "role resolved");

        let mut resolved = self.inner.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        *resolved = Some(ResolvedRole { racf, role, resolved_at: Instant::now() });
        Ok(role)
    }

    fn cached_role(&self, racf: &Racf) -> Option<Role> {
        let resolved = self.inner.resolved.lock().unwrap_or_else(PoisonError::into_inner);
        resolved.as_ref().and_then(|entry| {
            (entry.racf == *racf && entry.resolved_at.elapsed() < ROLE_TTL).then_some(entry.role)
        })
    }
}

fn io_error(err: std::io::Error) -> CoreError {
    CoreError::Io { message: err.to_string() }
}
