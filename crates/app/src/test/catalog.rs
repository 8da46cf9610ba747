//! Scripted catalog client.

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use orderdesk::products::Product;
use tokio::sync::Semaphore;

use crate::{
    domain::catalog::{CatalogClient, CatalogClientError},
    session::SessionContext,
};

/// Catalog client that replays queued responses and can hold every fetch at a gate until
/// the test opens it. An exhausted script answers with an empty list.
#[derive(Debug)]
pub(crate) struct ScriptedCatalog {
    responses: Mutex<VecDeque<Result<Vec<Product>, CatalogClientError>>>,
    calls: AtomicUsize,
    gate: Semaphore,
}

impl ScriptedCatalog {
    /// Fetches complete as soon as they are polled.
    pub(crate) fn new() -> Self {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    /// Fetches wait until [`ScriptedCatalog::open`] is called.
    pub(crate) fn gated() -> Self {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: Semaphore::new(permits),
        }
    }

    pub(crate) fn push_ok(&self, products: Vec<Product>) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(Ok(products));
    }

    pub(crate) fn push_err(&self, error: CatalogClientError) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(Err(error));
    }

    pub(crate) fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS - self.gate.available_permits());
    }

    /// Number of fetches started so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch_products(
        &self,
        _session: &SessionContext,
    ) -> Result<Vec<Product>, CatalogClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let _permit = self.gate.acquire().await.expect("gate closed");

        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
