//! RAII lease for pooled tabs.
//!
//! This module provides [`TabLease`], which wraps a pooled tab and
//! automatically returns it when dropped.
//!
//! # Overview
//!
//! The lease implements the RAII pattern so tabs always come back to the
//! pool, even if:
//! - Your code returns early
//! - An error occurs
//! - A panic happens
//!
//! # Usage Pattern
//!
//! ```rust,ignore
//! let Some(tab) = pool.acquire() else {
//!     // Pool exhausted; tell the caller to retry later
//!     return Err(TranslateServiceError::PoolExhausted);
//! };
//!
//! // Drive the translation page (via Deref to the tab trait)
//! tab.navigate("https://translate.google.com/?sl=auto&tl=en&text=hello")?;
//! let text = tab.query_text(".result", Duration::from_secs(10))?;
//!
//! // Tab automatically returned when `tab` goes out of scope
//! ```
//!
//! # Stale Leases
//!
//! If the pool refreshes while a lease is out, the tab belongs to a dead
//! browser session. Returning it is a silent no-op: the pool recognizes
//! the stale id and discards the tab instead of re-pooling it.

use std::sync::Arc;

use crate::driver::SessionTab;
use crate::pool::TabPoolInner;
use crate::tab::PooledTab;

/// RAII lease on a pooled tab.
///
/// Automatically returns the tab to the pool when dropped, ensuring the
/// slot is recovered even if the leasing code panics.
///
/// # Thread Safety
///
/// `TabLease` is `Send`: a lease can move to another thread (typically
/// into a `spawn_blocking` closure), but a single lease is meant to be
/// driven by one task at a time.
///
/// # Explicit Return
///
/// Drop the lease to return the tab early:
///
/// ```rust,ignore
/// let tab = pool.acquire().unwrap();
/// // ... do work ...
/// drop(tab); // slot immediately available to other callers
/// ```
pub struct TabLease {
    /// The pooled tab (Option allows taking in Drop).
    tab: Option<PooledTab>,

    /// Reference to pool internals for returning the tab.
    ///
    /// Held as an `Arc` so the return works even if the owning
    /// [`TabPool`](crate::TabPool) was dropped in the meantime.
    pool: Arc<TabPoolInner>,
}

impl TabLease {
    /// Create a new lease.
    ///
    /// Called internally by [`TabPool::acquire()`](crate::TabPool::acquire).
    pub(crate) fn new(tab: PooledTab, pool: Arc<TabPoolInner>) -> Self {
        Self {
            tab: Some(tab),
            pool,
        }
    }

    /// Unique id of the leased tab.
    ///
    /// Useful for log correlation.
    pub fn id(&self) -> u64 {
        self.tab.as_ref().map(|t| t.id()).unwrap_or(0)
    }

    /// The recycle cycle this tab was provisioned under.
    pub fn generation(&self) -> u64 {
        self.tab.as_ref().map(|t| t.generation()).unwrap_or(0)
    }

    /// Time since the tab was provisioned.
    pub fn age(&self) -> std::time::Duration {
        self.tab.as_ref().map(|t| t.age()).unwrap_or_default()
    }
}

impl std::ops::Deref for TabLease {
    type Target = dyn SessionTab;

    /// Transparently access the underlying tab.
    ///
    /// All [`SessionTab`] operations work directly on the lease:
    ///
    /// ```rust,ignore
    /// let tab = pool.acquire().unwrap();
    /// tab.navigate("https://example.com")?;
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if called after the tab was returned. This cannot happen in
    /// normal usage since the lease owns the tab until it is dropped.
    fn deref(&self) -> &Self::Target {
        self.tab.as_ref().unwrap().tab().as_ref()
    }
}

impl Drop for TabLease {
    /// Return the tab to the pool.
    ///
    /// Uses `Option::take()` so the return happens exactly once. The pool
    /// decides whether the tab is re-pooled or discarded (stale generation
    /// or mid-shutdown returns are discarded).
    fn drop(&mut self) {
        if let Some(tab) = self.tab.take() {
            log::debug!("TabLease {} dropped, returning to pool", tab.id());
            TabPoolInner::release(&self.pool, tab);
        }
    }
}

impl std::fmt::Debug for TabLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tab {
            Some(tab) => f
                .debug_struct("TabLease")
                .field("id", &tab.id())
                .field("generation", &tab.generation())
                .finish(),
            None => f
                .debug_struct("TabLease")
                .field("state", &"returned")
                .finish(),
        }
    }
}
