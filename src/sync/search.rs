use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::storage::config::SearchConfig;
use crate::sync::api::{ApiError, GroomingApi, PetSearchResult};

/// Drops work superseded by a newer call made within `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidates every pending run.
    pub fn cancel_pending(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Waits out the delay and runs `task` unless another call arrived in
    /// the meantime, in which case this one yields `None`.
    pub async fn run<F, Fut, T>(&self, task: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.cancel_pending();
        tokio::time::sleep(self.delay).await;

        if !self.is_current(ticket) {
            tracing::trace!("Debounced run {} superseded", ticket);
            return None;
        }
        Some(task().await)
    }
}

pub struct PetSearch<A> {
    api: Arc<A>,
    debouncer: Debouncer,
    min_query_len: usize,
}

impl<A> Clone for PetSearch<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            debouncer: self.debouncer.clone(),
            min_query_len: self.min_query_len,
        }
    }
}

impl<A: GroomingApi> PetSearch<A> {
    pub fn new(api: Arc<A>, config: &SearchConfig) -> Self {
        Self {
            api,
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            min_query_len: config.min_query_len,
        }
    }

    /// `Ok(None)` means a newer keystroke replaced this query. Queries shorter
    /// than the minimum clear the results without touching the backend.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<PetSearchResult>>, ApiError> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            self.debouncer.cancel_pending();
            return Ok(Some(Vec::new()));
        }

        self.debouncer
            .run(|| self.api.search_pets(query))
            .await
            .transpose()
    }
}
