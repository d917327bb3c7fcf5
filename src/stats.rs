//! Pool statistics snapshot.
//!
//! This module provides [`PoolStats`], a point-in-time view of pool
//! occupancy useful for monitoring, logging and readiness checks.
//!
//! # Example
//!
//! ```rust,ignore
//! let stats = pool.stats();
//! println!("Available: {}, In use: {}", stats.available, stats.in_use);
//! ```

/// Point-in-time snapshot of pool occupancy.
///
/// Returned by [`TabPool::stats()`](crate::TabPool::stats). Values are a
/// consistent snapshot taken under the pool lock, but may be outdated by
/// the time you read them.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `available` | Tabs parked and ready to lease |
/// | `in_use` | Tabs currently leased out |
/// | `target` | Configured tab count per session |
///
/// # Example
///
/// ```rust
/// use translate_tab_pool::PoolStats;
///
/// let stats = PoolStats {
///     available: 3,
///     in_use: 2,
///     target: 5,
/// };
///
/// println!("Pool status: {}/{} available", stats.available, stats.target);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Tabs parked and ready to lease.
    pub available: usize,

    /// Tabs currently leased out.
    pub in_use: usize,

    /// Configured tab count per session.
    ///
    /// `available + in_use` can be lower after partial provisioning
    /// failures, but never higher.
    pub target: usize,
}

impl PoolStats {
    /// Total tabs the pool currently holds (parked plus leased).
    pub fn total(&self) -> usize {
        self.available + self.in_use
    }

    /// Whether at least one tab can be leased right now.
    pub fn has_available(&self) -> bool {
        self.available > 0
    }

    /// Whether the pool is running below its configured size.
    ///
    /// True after partial provisioning failures or a failed refresh.
    pub fn is_degraded(&self) -> bool {
        self.total() < self.target
    }

    /// Whether the pool holds no tabs at all.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "available: {}, in use: {}, target: {}",
            self.available, self.in_use, self.target
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
