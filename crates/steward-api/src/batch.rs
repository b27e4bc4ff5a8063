//! Chunked batch requests with cooperative throttling
//!
//! The wiki APIs accept at most 50 titles or ids per call, and expect a
//! pause between successive calls. Chunking covers the input exactly once
//! with no duplication and no gaps, preserving relative order within each
//! batch. Failed requests are not retried here; failures propagate to the
//! caller.

use std::time::Duration;
use tracing::debug;

/// Maximum titles/ids per API call, fixed by the wiki API
pub const MAX_BATCH_SIZE: usize = 50;

/// Default pause between successive batch requests (seconds)
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 1;

/// Split a collection of identifiers into batches of at most `max_size`.
///
/// A `max_size` of zero is clamped to one.
pub fn chunked<T>(items: &[T], max_size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(max_size.max(1))
}

/// Fixed inter-batch pause used as cooperative rate limiting.
///
/// This is a scheduling concern, not a retry mechanism: the throttle only
/// spaces requests out, it never re-issues them.
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Create a throttle with the given inter-batch delay
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a throttle with the default one-second delay
    pub fn default_delay() -> Self {
        Self::new(Duration::from_secs(DEFAULT_BATCH_DELAY_SECS))
    }

    /// The configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pause before issuing the next batch request
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("throttling for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: concatenating the batches reproduces the input
        #[test]
        fn test_chunking_covers_input(
            items in proptest::collection::vec(any::<u16>(), 0..500),
            max_size in 1usize..80,
        ) {
            let rejoined: Vec<u16> = chunked(&items, max_size).flatten().copied().collect();
            prop_assert_eq!(rejoined, items);
        }

        /// Property: no batch exceeds the maximum size
        #[test]
        fn test_no_batch_exceeds_max(
            items in proptest::collection::vec(any::<u16>(), 0..500),
            max_size in 1usize..80,
        ) {
            for batch in chunked(&items, max_size) {
                prop_assert!(batch.len() <= max_size);
                prop_assert!(!batch.is_empty());
            }
        }
    }
}
