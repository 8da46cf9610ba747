//! Product cache.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use jiff::Timestamp;
use orderdesk::products::Product;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    domain::catalog::{
        client::CatalogClient,
        errors::{CacheError, CatalogClientError},
    },
    session::{SessionContext, SessionSource},
};

/// How long a fetched product list is served without going back to the ERP.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

type FetchResult = Result<Arc<[Product]>, Arc<CatalogClientError>>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

enum Lookup {
    Cached(Arc<[Product]>),
    Pending(SharedFetch),
}

#[derive(Default)]
struct CacheState {
    products: Option<Arc<[Product]>>,
    fetched_at: Option<Instant>,
    updated_at: Option<Timestamp>,
    in_flight: Option<SharedFetch>,
}

impl CacheState {
    fn fresh(&self, ttl: Duration) -> Option<Arc<[Product]>> {
        let fetched_at = self.fetched_at?;

        if fetched_at.elapsed() < ttl {
            self.products.clone()
        } else {
            None
        }
    }

    fn replace(&mut self, products: Arc<[Product]>) {
        self.products = Some(products);
        self.fetched_at = Some(Instant::now());
        self.updated_at = Some(Timestamp::now());
    }
}

/// Last known product list with TTL expiry and at most one outstanding fetch.
///
/// Concurrent callers that arrive while a fetch is running join it and all observe the same
/// list or the same error. A failed fetch leaves the previous list in place.
pub struct ProductCache {
    client: Arc<dyn CatalogClient>,
    sessions: Arc<dyn SessionSource>,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl ProductCache {
    #[must_use]
    pub fn new(
        client: Arc<dyn CatalogClient>,
        sessions: Arc<dyn SessionSource>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            sessions,
            ttl,
            state: Arc::default(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the product list, fetching it when missing, expired or `force`d.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Session`] when a fetch is needed and nobody is logged in, or
    /// [`CacheError::Fetch`] when the fetch this call started or joined failed.
    pub async fn ensure_loaded(&self, force: bool) -> Result<Arc<[Product]>, CacheError> {
        match self.lookup(force)? {
            Lookup::Cached(products) => Ok(products),
            Lookup::Pending(fetch) => fetch.await.map_err(CacheError::Fetch),
        }
    }

    /// Unconditionally re-fetch, joining any fetch already running.
    ///
    /// # Errors
    ///
    /// See [`ProductCache::ensure_loaded`].
    pub async fn refresh(&self) -> Result<Arc<[Product]>, CacheError> {
        self.ensure_loaded(true).await
    }

    /// Warm the cache without waiting for it.
    ///
    /// A needed fetch is registered before this returns, so later callers join it. The fetch is
    /// driven by a spawned task and its failures are logged and otherwise ignored. Must be
    /// called from within a tokio runtime.
    pub fn prefetch(&self) {
        match self.lookup(false) {
            Ok(Lookup::Cached(_)) => {}
            Ok(Lookup::Pending(fetch)) => {
                tokio::spawn(async move {
                    if let Err(error) = fetch.await {
                        warn!(%error, "product prefetch failed");
                    }
                });
            }
            Err(error) => warn!(%error, "product prefetch skipped"),
        }
    }

    /// Current list without any I/O, regardless of age.
    #[must_use]
    pub fn peek(&self) -> Option<Arc<[Product]>> {
        lock(&self.state).products.clone()
    }

    /// Replace the list directly and restart its TTL.
    pub fn set(&self, products: Vec<Product>) {
        lock(&self.state).replace(products.into());
    }

    /// Wall-clock time the list was last replaced.
    #[must_use]
    pub fn last_updated(&self) -> Option<Timestamp> {
        lock(&self.state).updated_at
    }

    /// Serve fresh data, join the running fetch, or start a new one.
    fn lookup(&self, force: bool) -> Result<Lookup, CacheError> {
        let mut state = lock(&self.state);

        if !force && let Some(products) = state.fresh(self.ttl) {
            debug!(count = products.len(), "serving cached products");

            return Ok(Lookup::Cached(products));
        }

        if let Some(in_flight) = &state.in_flight {
            debug!(force, "joining in-flight product fetch");

            return Ok(Lookup::Pending(in_flight.clone()));
        }

        let session = self.sessions.current()?;
        let fetch = self.start_fetch(session);

        state.in_flight = Some(fetch.clone());

        Ok(Lookup::Pending(fetch))
    }

    fn start_fetch(&self, session: SessionContext) -> SharedFetch {
        let client = Arc::clone(&self.client);
        let state = Arc::downgrade(&self.state);

        async move {
            info!(employee_id = %session.employee_id(), "fetching product catalog");

            let result: FetchResult = client
                .fetch_products(&session)
                .await
                .map(Arc::from)
                .map_err(Arc::new);

            complete_fetch(&state, &result);

            result
        }
        .boxed()
        .shared()
    }
}

impl Debug for ProductCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let state = lock(&self.state);

        f.debug_struct("ProductCache")
            .field("ttl", &self.ttl)
            .field("products", &state.products.as_deref().map(<[Product]>::len))
            .field("updated_at", &state.updated_at)
            .field("in_flight", &state.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

fn complete_fetch(state: &Weak<Mutex<CacheState>>, result: &FetchResult) {
    let Some(state) = state.upgrade() else {
        return;
    };

    let mut state = lock(&state);

    state.in_flight = None;

    match result {
        Ok(products) => {
            info!(count = products.len(), "product cache updated");

            state.replace(Arc::clone(products));
        }
        Err(error) => warn!(%error, "product fetch failed, keeping previous list"),
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
