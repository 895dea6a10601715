//! Read-through cache over a row source.
//!
//! A snapshot of all rows is reused for the configured time-to-live. When the
//! snapshot is missing or stale, the first caller starts a fetch on a
//! background task and every concurrent caller awaits that same fetch, so the
//! upstream is hit at most once per expiry. The fetch runs to completion even
//! if every waiter gives up, and its outcome (rows or error) is delivered to
//! all of them. A failed fetch leaves no snapshot behind, so the next call
//! tries again.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::boat::RawRow;
use crate::error::{Error, Result};
use crate::source::RowSource;

/// Rows shared between the cache and its callers.
pub type Rows = Arc<Vec<RawRow>>;

type FetchResult = std::result::Result<Rows, Arc<Error>>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

#[derive(Debug)]
struct Snapshot {
    rows: Rows,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Snapshot>,
    in_flight: Option<SharedFetch>,
}

impl std::fmt::Debug for CacheState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheState")
            .field("snapshot", &self.snapshot)
            .field("in_flight", &self.in_flight.is_some())
            .finish()
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Time-bounded, single-flight cache of every row a source produces.
#[derive(Debug, Clone)]
pub struct RowCache {
    source: Arc<dyn RowSource>,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl RowCache {
    /// Create an empty cache in front of `source`.
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// How long a snapshot stays valid.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The source behind this cache.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn RowSource> {
        &self.source
    }

    /// Return every row, fetching from the source if the snapshot is stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] wrapping the source's error when the fetch
    /// this call started or joined fails.
    pub async fn get(&self) -> Result<Rows> {
        let fetch = {
            let mut state = lock(&self.state);

            if let Some(snapshot) = state.snapshot.as_ref() {
                if snapshot.fetched_at.elapsed() < self.ttl {
                    debug!(rows = snapshot.rows.len(), "Row cache hit");
                    return Ok(Arc::clone(&snapshot.rows));
                }
            }

            if let Some(fetch) = state.in_flight.as_ref() {
                debug!("Row cache miss, joining fetch in progress");
                fetch.clone()
            } else {
                debug!(source = self.source.name(), "Row cache miss, fetching");
                let fetch = self.spawn_fetch();
                state.in_flight = Some(fetch.clone());
                fetch
            }
        };

        fetch.await.map_err(Error::Fetch)
    }

    /// Drop the current snapshot so the next call fetches again.
    ///
    /// A fetch already in progress is left alone.
    pub fn invalidate(&self) {
        lock(&self.state).snapshot = None;
    }

    /// Check whether a snapshot exists and is still within its time-to-live.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        lock(&self.state)
            .snapshot
            .as_ref()
            .is_some_and(|s| s.fetched_at.elapsed() < self.ttl)
    }

    // Must be called with the state lock held, so the task cannot clear
    // `in_flight` before the caller has installed it.
    fn spawn_fetch(&self) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            let result: FetchResult = source.fetch_rows().await.map(Arc::new).map_err(Arc::new);

            let mut state = lock(&state);
            state.in_flight = None;
            if let Ok(rows) = &result {
                info!(rows = rows.len(), "Row cache populated");
                state.snapshot = Some(Snapshot {
                    rows: Arc::clone(rows),
                    fetched_at: Instant::now(),
                });
            }
            result
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(Arc::new(Error::internal(format!("row fetch task failed: {e}")))),
            }
        }
        .boxed()
        .shared()
    }
}
