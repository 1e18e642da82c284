//! I/O concurrency limiting
//!
//! One `IoLimiter` is shared by every hashing operation of a fingerprint run.
//! A permit covers exactly one file read or one directory listing; callers
//! never hold a permit while waiting on child work, so a deep tree cannot
//! starve itself.

use crate::error::FingerprintError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Gate bounding the number of in-flight I/O operations
#[derive(Debug)]
pub struct IoLimiter {
    semaphore: Semaphore,
    limit: usize,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// A held slot; released on drop
#[derive(Debug)]
pub struct IoPermit<'a> {
    _permit: SemaphorePermit<'a>,
    counters: Arc<Counters>,
}

impl Drop for IoPermit<'_> {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl IoLimiter {
    /// Create a limiter allowing `limit` concurrent operations (minimum 1)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Semaphore::new(limit),
            limit,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> Result<IoPermit<'_>, FingerprintError> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FingerprintError::LimiterClosed)?;

        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);

        Ok(IoPermit {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Operations currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders observed so far
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}
