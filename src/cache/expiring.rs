// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-slot expiring cache with a coalesced refill.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::Result;

/// Future returned by a refill function.
pub type RefillFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// Function producing a fresh value for an [`ExpiringCache`].
pub type RefillFn<T> = Arc<dyn Fn() -> RefillFuture<T> + Send + Sync>;

/// Outcome published to callers waiting on an in-flight refill.
type Outcome<T> = Option<Result<T>>;

struct Slot<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    in_flight: Option<watch::Receiver<Outcome<T>>>,
}

impl<T: Clone> Slot<T> {
    fn fresh_value(&self, ttl: Duration) -> Option<T> {
        match (&self.value, self.fetched_at) {
            (Some(value), Some(at)) if at.elapsed() < ttl => Some(value.clone()),
            _ => None,
        }
    }
}

enum Role<T> {
    Hit(T),
    Leader(InFlight<T>),
    Follower(watch::Receiver<Outcome<T>>),
}

/// A value with a time-to-live and an exactly-once-per-expiry refill.
///
/// - A value younger than the TTL is returned without calling the refill.
/// - Once expired, the first caller runs the refill. Callers arriving while
///   that refill is outstanding wait for it and receive the same outcome,
///   success or failure.
/// - A failed refill leaves the previous value and its timestamp untouched,
///   so the next call after the failure tries again.
///
/// Timestamps use [`tokio::time::Instant`], so paused-clock tests can move
/// the cache through its TTL with `tokio::time::advance`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// use zeptrion_lib::cache::{ExpiringCache, RefillFuture};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> zeptrion_lib::Result<()> {
/// let calls = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&calls);
/// let cache = ExpiringCache::new(Duration::from_secs(5), move || -> RefillFuture<u32> {
///     let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
///     Box::pin(async move { Ok(n) })
/// });
///
/// assert_eq!(cache.get().await?, 1);
/// assert_eq!(cache.get().await?, 1); // served from the cache
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// ```
pub struct ExpiringCache<T> {
    ttl: Duration,
    refill: RefillFn<T>,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> ExpiringCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache that is filled by `refill` on first use.
    pub fn new<F>(ttl: Duration, refill: F) -> Self
    where
        F: Fn() -> RefillFuture<T> + Send + Sync + 'static,
    {
        Self {
            ttl,
            refill: Arc::new(refill),
            slot: Arc::new(Mutex::new(Slot {
                value: None,
                fetched_at: None,
                in_flight: None,
            })),
        }
    }

    /// Returns the time-to-live of cached values.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value, refilling it if it has expired.
    ///
    /// # Errors
    ///
    /// Returns the refill's error if a refill was needed and failed. Every
    /// caller that joined the same refill receives a clone of that error.
    pub async fn get(&self) -> Result<T> {
        loop {
            let role = {
                let mut slot = self.slot.lock();
                if let Some(value) = slot.fresh_value(self.ttl) {
                    Role::Hit(value)
                } else if let Some(rx) = &slot.in_flight {
                    Role::Follower(rx.clone())
                } else {
                    let (tx, rx) = watch::channel(None);
                    slot.in_flight = Some(rx);
                    Role::Leader(InFlight {
                        slot: Arc::clone(&self.slot),
                        tx: Some(tx),
                    })
                }
            };

            match role {
                Role::Hit(value) => {
                    tracing::trace!("Serving cached value");
                    return Ok(value);
                }
                Role::Leader(in_flight) => return self.run_refill(in_flight).await,
                Role::Follower(mut rx) => {
                    tracing::trace!("Joining in-flight refill");
                    if let Ok(outcome) = rx.wait_for(Option::is_some).await
                        && let Some(result) = outcome.as_ref()
                    {
                        return result.clone();
                    }
                    // The refilling task was dropped before finishing; retry.
                    tracing::debug!("In-flight refill abandoned, retrying");
                }
            }
        }
    }

    async fn run_refill(&self, mut in_flight: InFlight<T>) -> Result<T> {
        let result = (self.refill)().await;
        in_flight.complete(&result);
        result
    }

    /// Returns the stored value regardless of its age, without refilling.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }

    /// Returns true if the next [`get`](Self::get) would run the refill.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.slot.lock().fresh_value(self.ttl).is_none()
    }

    /// Returns how long ago the stored value was fetched.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        self.slot.lock().fetched_at.map(|at| at.elapsed())
    }

    /// Marks the stored value as expired.
    ///
    /// The value stays available through [`peek`](Self::peek). A refill that
    /// is already in flight is not affected.
    pub fn invalidate(&self) {
        self.slot.lock().fetched_at = None;
    }
}

impl<T> fmt::Debug for ExpiringCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("ExpiringCache")
            .field("ttl", &self.ttl)
            .field("has_value", &slot.value.is_some())
            .field("fetched_at", &slot.fetched_at)
            .field("refilling", &slot.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

/// Marker held by the caller running a refill.
///
/// Dropping it without calling [`complete`](Self::complete) clears the
/// in-flight marker before the sender closes, so waiting callers retry
/// instead of joining a dead refill.
struct InFlight<T> {
    slot: Arc<Mutex<Slot<T>>>,
    tx: Option<watch::Sender<Outcome<T>>>,
}

impl<T: Clone> InFlight<T> {
    fn complete(&mut self, result: &Result<T>) {
        {
            let mut slot = self.slot.lock();
            if let Ok(value) = result {
                slot.value = Some(value.clone());
                slot.fetched_at = Some(Instant::now());
            }
            slot.in_flight = None;
        }
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result.clone()));
        }
    }
}

impl<T> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.slot.lock().in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::{Error, ProtocolError};

    fn counting_cache(
        ttl: Duration,
        delay: Duration,
        fail: bool,
    ) -> (ExpiringCache<u32>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let cache = ExpiringCache::new(ttl, move || -> RefillFuture<u32> {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                if fail {
                    Err(Error::from(ProtocolError::Timeout(10_000)))
                } else {
                    Ok(n)
                }
            })
        });
        (cache, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_value_is_served_without_refill() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::ZERO, false);

        assert_eq!(cache.get().await.unwrap(), 1);
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(cache.get().await.unwrap(), 1);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_value_triggers_one_refill() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::ZERO, false);

        assert_eq!(cache.get().await.unwrap(), 1);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(cache.is_expired());
        assert_eq!(cache.get().await.unwrap(), 2);
        assert_eq!(cache.get().await.unwrap(), 2);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_refill() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::from_secs(1), false);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_failure() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::from_secs(1), true);
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get().await })
            })
            .collect();

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(
                err,
                Error::DeviceUnreachable(ProtocolError::Timeout(_))
            ));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_reset_expiry() {
        let fail = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let calls = Arc::new(AtomicU32::new(0));
        let (flag, counter) = (Arc::clone(&fail), Arc::clone(&calls));
        let cache = ExpiringCache::new(Duration::from_secs(5), move || -> RefillFuture<u32> {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let fail = flag.load(Ordering::SeqCst);
            Box::pin(async move {
                if fail {
                    Err(Error::from(ProtocolError::UnexpectedStatus { status: 500 }))
                } else {
                    Ok(n)
                }
            })
        });

        assert_eq!(cache.get().await.unwrap(), 1);
        tokio::time::advance(Duration::from_secs(6)).await;

        fail.store(true, Ordering::SeqCst);
        assert!(cache.get().await.is_err());
        // Still expired, previous value kept, next call fetches again.
        assert!(cache.is_expired());
        assert_eq!(cache.peek(), Some(1));
        assert!(cache.get().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        fail.store(false, Ordering::SeqCst);
        assert_eq!(cache.get().await.unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_refill_is_taken_over() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::from_secs(1), false);
        let cache = Arc::new(cache);

        let leader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get().await })
        };
        tokio::task::yield_now().await;
        let follower = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get().await })
        };
        tokio::task::yield_now().await;

        leader.abort();
        assert!(leader.await.unwrap_err().is_cancelled());

        assert_eq!(follower.await.unwrap().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refill() {
        let (cache, calls) = counting_cache(Duration::from_secs(5), Duration::ZERO, false);

        assert_eq!(cache.get().await.unwrap(), 1);
        cache.invalidate();
        assert_eq!(cache.peek(), Some(1));
        assert_eq!(cache.get().await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_cache_reports_expired() {
        let (cache, _) = counting_cache(Duration::from_secs(5), Duration::ZERO, false);
        assert!(cache.is_expired());
        assert!(cache.peek().is_none());
        assert!(cache.age().is_none());
    }
}
