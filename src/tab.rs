//! Pooled tab with metadata for pool management.
//!
//! This module provides [`PooledTab`], which wraps a driver-level tab with
//! the bookkeeping the pool needs.
//!
//! # Overview
//!
//! Each tab in the pool carries:
//! - **Unique ID**: for the in-use map, log correlation and stale-return
//!   detection
//! - **Generation**: the recycle cycle it was provisioned under
//! - **Provisioning time**: for age reporting in logs
//!
//! # Internal Use
//!
//! This struct is internal to the pool. Users drive tabs through
//! [`TabLease`](crate::TabLease), which provides access via `Deref`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::driver::SessionTab;

/// A provisioned tab with metadata for pool management.
///
/// # Thread Safety
///
/// The tab itself is shared via [`Arc`]; the metadata is immutable after
/// construction, so clones are cheap and safe to move across threads.
#[derive(Clone)]
pub(crate) struct PooledTab {
    /// Globally unique identifier, assigned from an atomic counter.
    ///
    /// Keys the in-use map; because ids are never reused, a stale lease
    /// from an earlier generation can never collide with a live one.
    id: u64,

    /// Recycle cycle this tab was provisioned under.
    generation: u64,

    /// The driver-level tab.
    tab: Arc<dyn SessionTab>,

    /// When provisioning finished (used for age reporting).
    provisioned_at: Instant,
}

impl PooledTab {
    /// Wrap a freshly provisioned driver tab.
    pub(crate) fn new(tab: Arc<dyn SessionTab>, generation: u64) -> Self {
        // Thread-safe monotonic ID generator
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);

        Self {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            generation,
            tab,
            provisioned_at: Instant::now(),
        }
    }

    /// Unique identifier of this tab.
    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// The recycle cycle this tab belongs to.
    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// The driver-level tab.
    #[inline]
    pub(crate) fn tab(&self) -> &Arc<dyn SessionTab> {
        &self.tab
    }

    /// Time since provisioning finished.
    #[inline]
    pub(crate) fn age(&self) -> Duration {
        self.provisioned_at.elapsed()
    }

    /// Age in whole minutes, for logging.
    #[inline]
    pub(crate) fn age_minutes(&self) -> u64 {
        self.provisioned_at.elapsed().as_secs() / 60
    }
}

impl std::fmt::Debug for PooledTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledTab")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("age_minutes", &self.age_minutes())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
