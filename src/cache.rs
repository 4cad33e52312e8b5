use std::future::Future;

use tokio::sync::Mutex;

/// Single-slot cache keyed by a refresh-window bucket.
///
/// Only the most recent bucket's value is retained; a call with any other
/// bucket rebuilds and replaces the slot. The bucket cadence doubles as
/// cache-busting: a bad value (e.g. a composite built from partial layers)
/// is served for at most one window and then rebuilt.
///
/// The lock is held across the builder, so concurrent callers for the same
/// bucket wait for the first one and share its result rather than computing
/// redundantly.
pub struct BucketCache<T> {
    slot: Mutex<Option<(i64, T)>>,
}

impl<T> Default for BucketCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BucketCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> BucketCache<T> {
    /// Return the cached value for `bucket`, or resolve `build` and cache
    /// its output. `build` is only polled on a miss.
    pub async fn get_or_insert_with<Fut>(&self, bucket: i64, build: Fut) -> T
    where
        Fut: Future<Output = T>,
    {
        let mut slot = self.slot.lock().await;
        if let Some((cached_bucket, value)) = slot.as_ref()
            && *cached_bucket == bucket
        {
            return value.clone();
        }
        let value = build.await;
        *slot = Some((bucket, value.clone()));
        value
    }
}
