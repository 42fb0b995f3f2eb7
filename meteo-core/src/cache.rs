use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

/// A loaded value and the instant it was loaded.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub value: Arc<T>,
    pub loaded_at: Instant,
}

/// Single-value cache refreshed once its entry is older than `ttl`.
///
/// Callers pass `now` explicitly, so expiry is driven by whoever owns the
/// clock. Failed loads are never stored: the error goes back to the caller
/// and the next call loads again.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn entry(&self) -> Option<&CacheEntry<T>> {
        self.entry.as_ref()
    }

    /// True while the entry's age does not exceed the TTL.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| now.saturating_duration_since(e.loaded_at) <= self.ttl)
    }

    /// The cached value, if still fresh.
    pub fn get(&self, now: Instant) -> Option<Arc<T>> {
        if self.is_fresh(now) {
            self.entry.as_ref().map(|e| Arc::clone(&e.value))
        } else {
            None
        }
    }

    pub async fn get_or_refresh<F, Fut, E>(&mut self, now: Instant, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(now) {
            return Ok(value);
        }

        // Expired values are never served, even if the reload fails.
        self.entry = None;

        let value = Arc::new(load().await?);
        self.entry = Some(CacheEntry {
            value: Arc::clone(&value),
            loaded_at: now,
        });
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
