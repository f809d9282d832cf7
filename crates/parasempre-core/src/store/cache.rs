// ── Read-through synchronization cache ──
//
// Key-addressed storage with freshness tracking and single-flight
// request coalescing. In-flight fetch outcomes are broadcast over
// `watch` channels so concurrent readers of the same key share one
// network round trip.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

use crate::error::CoreError;

/// One cached slot: last-known value plus freshness flag. A stale slot
/// keeps its value available to `peek` until the next fetch replaces it.
struct Slot<V> {
    value: Arc<V>,
    fresh: bool,
}

/// Broadcast payload of an in-flight fetch: `None` until the leader
/// finishes, then the shared outcome every waiter clones.
type FlightOutcome<V> = Option<Result<Arc<V>, CoreError>>;

/// A read-through cache with single-flight coalescing.
///
/// Values live behind `Arc`, so hits are cheap pointer clones. A read
/// of a missing or stale key runs the supplied fetch exactly once; any
/// reader arriving while that fetch is pending awaits its outcome
/// instead of issuing a duplicate request. Failed fetches are shared
/// with every waiter and leave the slot untouched.
pub(crate) struct SyncCache<K, V>
where
    K: Eq + Hash + Clone,
{
    slots: DashMap<K, Slot<V>>,

    /// Pending fetches by key. The leader removes its entry before
    /// broadcasting, so late readers start a new flight instead of
    /// joining a finished one.
    inflight: DashMap<K, watch::Receiver<FlightOutcome<V>>>,
}

impl<K, V> SyncCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self { slots: DashMap::new(), inflight: DashMap::new() }
    }

    /// Return the cached value when fresh, otherwise fetch through.
    ///
    /// No retry happens here: a failed fetch surfaces to every caller
    /// that shared the flight, and the next read starts over.
    pub(crate) async fn read_through<F, Fut>(&self, key: K, fetch: F) -> Result<Arc<V>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CoreError>>,
    {
        if let Some(slot) = self.slots.get(&key) {
            if slot.fresh {
                return Ok(Arc::clone(&slot.value));
            }
        }

        // Either join the flight already running for this key, or
        // register as its leader. The entry API makes the decision
        // atomic under races.
        let leader = match self.inflight.entry(key.clone()) {
            Entry::Occupied(occupied) => {
                let rx = occupied.get().clone();
                drop(occupied);
                return Self::join_flight(rx).await;
            }
            Entry::Vacant(vacant) => {
                let (tx, rx) = watch::channel(None);
                vacant.insert(rx);
                tx
            }
        };

        let outcome = fetch().await.map(Arc::new);
        if let Ok(value) = &outcome {
            self.slots
                .insert(key.clone(), Slot { value: Arc::clone(value), fresh: true });
        }
        self.inflight.remove(&key);
        // Waiters may all have gone away; a send error is fine.
        let _ = leader.send(Some(outcome.clone()));
        outcome
    }

    /// Mark a key stale. The next read fetches; `peek` still serves the
    /// old value in the meantime.
    pub(crate) fn invalidate(&self, key: &K) {
        if let Some(mut slot) = self.slots.get_mut(key) {
            slot.fresh = false;
        }
    }

    /// Store a fresh value directly, as from a successful write response.
    pub(crate) fn write_through(&self, key: K, value: V) {
        self.slots.insert(key, Slot { value: Arc::new(value), fresh: true });
    }

    /// Drop a key outright (deleted entities).
    pub(crate) fn remove(&self, key: &K) {
        self.slots.remove(key);
    }

    /// Last-known value regardless of freshness. Never fetches.
    #[allow(dead_code)]
    pub(crate) fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.slots.get(key).map(|slot| Arc::clone(&slot.value))
    }

    /// Freshness of a key; `None` when the key has never been stored.
    #[allow(dead_code)]
    pub(crate) fn is_fresh(&self, key: &K) -> Option<bool> {
        self.slots.get(key).map(|slot| slot.fresh)
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Await the outcome of another reader's flight.
    async fn join_flight(mut rx: watch::Receiver<FlightOutcome<V>>) -> Result<Arc<V>, CoreError> {
        let outcome = {
            let guard = rx.wait_for(Option::is_some).await.map_err(|_| {
                CoreError::Transport {
                    message: "a requisição pendente foi interrompida".to_owned(),
                    status: None,
                }
            })?;
            guard.clone()
        };
        match outcome {
            Some(result) => result,
            // `wait_for(is_some)` cannot yield `None`; kept for totality.
            None => Err(CoreError::Transport {
                message: "a requisição pendente foi interrompida".to_owned(),
                status: None,
            }),
        }
    }
}
