// ── Cache infrastructure ──

mod cache;

pub(crate) use cache::SyncCache;
