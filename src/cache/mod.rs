//! Single-slot TTL cache in front of the upstream API.
//!
//! One entry, one account. Reads within the TTL are served from memory.
//! When the entry is stale or missing, exactly one refresh runs no matter
//! how many scrapes arrive; the others wait on the same shared future.
//!
//! The refresh runs in its own task, so a scrape that disconnects
//! mid-refresh does not cancel it and the result still lands in the cache.
//!
//! State machine: `EMPTY -> FRESH -> STALE -> FRESH ...`. A failed refresh
//! leaves the entry exactly as it was (expiry included), so the next read
//! retries immediately. The in-flight marker is cleared in the same critical
//! section that stores the result.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;

use crate::api::DomainSource;
use crate::domain::DomainListResponse;

type RefreshFuture = Shared<BoxFuture<'static, Arc<DomainListResponse>>>;

/// A cached response and the instant it stops being fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    data: Arc<DomainListResponse>,
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry expiring at `expires_at`.
    pub fn new(data: Arc<DomainListResponse>, expires_at: Instant) -> Self {
        CacheEntry { data, expires_at }
    }

    /// Fresh iff `now` is strictly before the expiry instant.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    /// The cached response.
    pub fn data(&self) -> &Arc<DomainListResponse> {
        &self.data
    }

    /// When the entry stops being fresh.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    inflight: Option<RefreshFuture>,
}

/// TTL cache for the account's domain list.
pub struct DomainCache {
    source: Arc<dyn DomainSource>,
    ttl: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl DomainCache {
    /// Creates an empty cache over `source`.
    pub fn new(source: Arc<dyn DomainSource>, ttl: Duration) -> Self {
        DomainCache {
            source,
            ttl,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of the stored entry, if any.
    pub fn entry(&self) -> Option<CacheEntry> {
        lock(&self.state).entry.clone()
    }

    /// Returns the current domain list, refreshing it if stale.
    ///
    /// Never fails. When a refresh fails the previous data is returned
    /// (stale), or an empty response when nothing was ever fetched.
    pub async fn get(&self) -> Arc<DomainListResponse> {
        let refresh = {
            let mut state = lock(&self.state);
            if let Some(entry) = &state.entry {
                if entry.is_fresh_at(Instant::now()) {
                    log::debug!("Serving domain list from cache");
                    return Arc::clone(&entry.data);
                }
            }
            match state.inflight.clone() {
                Some(inflight) => {
                    log::debug!("Waiting for in-flight refresh");
                    inflight
                }
                None => {
                    let refresh = self.spawn_refresh();
                    state.inflight = Some(refresh.clone());
                    refresh
                }
            }
        };
        refresh.await
    }

    /// Starts a refresh task. Must be called with the state lock held so
    /// the returned future is registered before the task can finish.
    fn spawn_refresh(&self) -> RefreshFuture {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let ttl = self.ttl;

        let task = tokio::spawn(async move {
            let mut clear = InflightGuard::new(Arc::clone(&state));
            let result = source.list_domains().await;

            let mut state = lock(&state);
            state.inflight = None;
            clear.disarm();
            match result {
                Ok(response) => {
                    if !response.is_ok() {
                        log::warn!(
                            "Upstream returned status {:?}: {}",
                            response.status,
                            response.error_message.as_deref().unwrap_or("no error message")
                        );
                    }
                    let data = Arc::new(response);
                    state.entry = Some(CacheEntry::new(Arc::clone(&data), expiry_after(ttl)));
                    log::debug!(
                        "Cached {} domain records for {}s",
                        data.domains.len(),
                        ttl.as_secs()
                    );
                    data
                }
                Err(e) => {
                    log::warn!("Failed to refresh domain list: {}", e);
                    fallback(&state)
                }
            }
        });

        let state = Arc::clone(&self.state);
        async move {
            match task.await {
                Ok(data) => data,
                Err(e) => {
                    log::error!("Domain list refresh task failed: {}", e);
                    fallback(&lock(&state))
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// Clears the in-flight marker if the refresh task unwinds before it
/// could clear it under the lock itself.
struct InflightGuard {
    state: Arc<Mutex<CacheState>>,
    armed: bool,
}

impl InflightGuard {
    fn new(state: Arc<Mutex<CacheState>>) -> Self {
        InflightGuard { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        if self.armed {
            lock(&self.state).inflight = None;
        }
    }
}

/// `now + ttl`, saturating at roughly 30 years for absurd TTLs.
fn expiry_after(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(30 * 365 * 24 * 60 * 60))
}

fn fallback(state: &CacheState) -> Arc<DomainListResponse> {
    state
        .entry
        .as_ref()
        .map(|entry| Arc::clone(&entry.data))
        .unwrap_or_default()
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
