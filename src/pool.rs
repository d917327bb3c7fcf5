//! Core tab pool implementation.
//!
//! This module provides [`TabPool`], a bounded pool of pre-provisioned
//! browser tabs parked on a translation page, and [`TabPoolBuilder`] for
//! constructing it.
//!
//! # Architecture
//!
//! ```text
//! TabPool (public facade, explicit instance)
//!     │
//!     ├── TabPoolInner (Arc-shared state)
//!     │   ├── state: Mutex<PoolState>
//!     │   │   ├── session: Option<Arc<dyn BrowserSession>>
//!     │   │   ├── available: Vec<PooledTab> (LIFO)
//!     │   │   ├── in_use: HashMap<u64, PooledTab>
//!     │   │   └── generation: u64
//!     │   ├── shutting_down: AtomicBool
//!     │   ├── returned: Notify (drain signal)
//!     │   └── lifecycle: tokio Mutex (refresh/shutdown exclusion)
//!     │
//!     └── RefreshScheduler (cancellable recycle timer)
//! ```
//!
//! # Critical Invariants
//!
//! 1. `available` and `in_use` are disjoint; their combined size never
//!    exceeds `target_size`
//! 2. No browser I/O while holding the state lock
//! 3. The lifecycle mutex serializes recycle against shutdown
//!
//! # Example
//!
//! ```rust,ignore
//! use translate_tab_pool::{ChromeSessionDriver, TabPool, TabPoolConfigBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TabPoolConfigBuilder::new().target_size(5).build()?;
//!     let driver = ChromeSessionDriver::from_config(&config);
//!
//!     let pool = TabPool::builder()
//!         .config(config)
//!         .driver(Box::new(driver))
//!         .build()?;
//!     pool.init().await?;
//!
//!     if let Some(tab) = pool.acquire() {
//!         // drive the translation page through the lease
//!     }
//!
//!     pool.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use tokio::task::JoinSet;

use crate::config::TabPoolConfig;
use crate::driver::{BrowserSession, SessionDriver};
use crate::error::{Result, TabPoolError};
use crate::handle::TabLease;
use crate::provision::provision_tab;
use crate::refresh::RefreshScheduler;
use crate::stats::PoolStats;
use crate::tab::PooledTab;

// ============================================================================
// Internal Pool State
// ============================================================================

/// Mutable pool state, guarded by a single mutex.
struct PoolState {
    /// The browser session all tabs live in. `None` before initialization
    /// and after shutdown.
    session: Option<Arc<dyn BrowserSession>>,

    /// Parked tabs, leased from the back (LIFO).
    available: Vec<PooledTab>,

    /// Leased tabs keyed by id.
    in_use: HashMap<u64, PooledTab>,

    /// Recycle counter; bumped on every refresh and at shutdown so stale
    /// returns are recognized and discarded.
    generation: u64,
}

/// Internal pool state shared between the facade, leases and the refresh
/// scheduler.
pub(crate) struct TabPoolInner {
    /// Immutable configuration.
    config: TabPoolConfig,

    /// Opens browser sessions at initialization and on every recycle.
    driver: Box<dyn SessionDriver>,

    /// All mutable state under one lock.
    state: Mutex<PoolState>,

    /// Set once shutdown begins; checked by acquire and the scheduler.
    shutting_down: AtomicBool,

    /// Set by the first successful `TabPool::init`; later calls are
    /// no-ops so a re-init can never stack a second tab batch on top of
    /// outstanding leases.
    initialized: AtomicBool,

    /// Signaled on every lease return so shutdown can drain without
    /// polling.
    returned: Notify,

    /// Serializes recycle against shutdown: whichever holds this finishes
    /// its whole session swap before the other starts.
    lifecycle: tokio::sync::Mutex<()>,
}

impl TabPoolInner {
    /// Create the shared inner state. No browser work happens here.
    pub(crate) fn new(config: TabPoolConfig, driver: Box<dyn SessionDriver>) -> Arc<Self> {
        Arc::new(Self {
            config,
            driver,
            state: Mutex::new(PoolState {
                session: None,
                available: Vec::new(),
                in_use: HashMap::new(),
                generation: 0,
            }),
            shutting_down: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            returned: Notify::new(),
            lifecycle: tokio::sync::Mutex::new(()),
        })
    }

    /// Open a session and provision the configured number of tabs.
    ///
    /// Session opening runs under `spawn_blocking`; provisioning fans out
    /// one blocking task per slot. Per-slot failures are logged and
    /// tolerated; only a failed session open is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Init`] if the session cannot be opened.
    pub(crate) async fn initialize(self: &Arc<Self>) -> Result<()> {
        let opener = Arc::clone(self);
        let session = tokio::task::spawn_blocking(move || opener.driver.open())
            .await
            .map_err(|e| TabPoolError::Init(format!("session open task failed: {e}")))??;

        let generation = self.state.lock().unwrap().generation;
        let target = self.config.target_size;

        log::debug!(
            "Session open; provisioning {} tab(s) (generation {})",
            target,
            generation
        );

        let mut tasks = JoinSet::new();
        for index in 0..target {
            let session = Arc::clone(&session);
            let config = self.config.clone();
            tasks
                .spawn_blocking(move || provision_tab(session.as_ref(), index, generation, &config));
        }

        let mut tabs = Vec::with_capacity(target);
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(tab)) => tabs.push(tab),
                Ok(Err(failure)) => log::warn!("Provisioning lost a slot: {}", failure),
                Err(e) => log::error!("Provisioning task failed to complete: {}", e),
            }
        }

        let provisioned = tabs.len();
        {
            let mut state = self.state.lock().unwrap();
            if state.generation != generation || self.is_shutting_down() {
                // A recycle or shutdown raced this initialization; the
                // session we built belongs to a dead generation.
                drop(state);
                log::warn!("Discarding freshly provisioned session (pool state moved on)");
                let _ = session.close();
                return Ok(());
            }
            state.session = Some(session);
            state.available = tabs;
        }

        if provisioned < target {
            log::warn!(
                "Pool running degraded: {}/{} tabs provisioned",
                provisioned,
                target
            );
        } else {
            log::info!("Pool ready: {}/{} tabs provisioned", provisioned, target);
        }

        Ok(())
    }

    /// Lease a tab, most recently returned first.
    ///
    /// Non-blocking: returns `None` when no tab is parked or the pool is
    /// shutting down. There is no waiting queue; callers translate `None`
    /// into their own back-pressure.
    pub(crate) fn acquire(self: &Arc<Self>) -> Option<TabLease> {
        if self.is_shutting_down() {
            log::debug!("acquire refused: pool is shutting down");
            return None;
        }

        let mut state = self.state.lock().unwrap();
        let tab = state.available.pop()?;
        state.in_use.insert(tab.id(), tab.clone());
        let remaining = state.available.len();
        drop(state);

        log::debug!("Leased tab {} ({} still available)", tab.id(), remaining);
        Some(TabLease::new(tab, Arc::clone(self)))
    }

    /// Return a leased tab to the pool.
    ///
    /// Called from the lease's `Drop`. The tab is re-pooled only if it is
    /// still known to the in-use map and belongs to the current
    /// generation; anything else is a stale return and is discarded
    /// silently. Always signals the drain waiter.
    pub(crate) fn release(self_arc: &Arc<Self>, tab: PooledTab) {
        let id = tab.id();
        {
            let mut state = self_arc.state.lock().unwrap();
            match state.in_use.remove(&id) {
                Some(_) => {
                    if self_arc.is_shutting_down() {
                        log::debug!("Tab {} returned during shutdown; discarding", id);
                    } else if tab.generation() != state.generation {
                        log::debug!(
                            "Tab {} is from generation {} (current {}); discarding",
                            id,
                            tab.generation(),
                            state.generation
                        );
                    } else {
                        state.available.push(tab);
                        log::trace!("Tab {} back in pool", id);
                    }
                }
                None => {
                    // A recycle already wrote this lease off.
                    log::debug!("Ignoring return of unknown tab {}", id);
                }
            }
        }
        self_arc.returned.notify_waiters();
    }

    /// Recycle the whole browser session.
    ///
    /// Bumps the generation (writing off every outstanding lease), drops
    /// all parked tabs, closes the old session and builds a fresh one. A
    /// failed rebuild leaves the pool degraded until the next fire; it
    /// never kills the scheduler.
    pub(crate) async fn recycle(self: &Arc<Self>) {
        if self.is_shutting_down() {
            return;
        }
        let _lifecycle = self.lifecycle.lock().await;
        if self.is_shutting_down() {
            return;
        }

        log::info!("Recycling browser session");

        let (old_session, invalidated) = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            let invalidated = state.in_use.len();
            state.in_use.clear();
            state.available.clear();
            (state.session.take(), invalidated)
        };
        if invalidated > 0 {
            log::warn!("Recycle invalidated {} outstanding lease(s)", invalidated);
        }
        self.returned.notify_waiters();

        if let Some(session) = old_session {
            match tokio::task::spawn_blocking(move || session.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("Old session close failed: {}", e),
                Err(e) => log::warn!("Old session close task failed: {}", e),
            }
        }

        if let Err(e) = self.initialize().await {
            log::error!("{}", TabPoolError::Refresh(e.to_string()));
            log::warn!("Pool empty until the next refresh fire");
        }
    }

    /// Drain outstanding leases and tear the session down.
    ///
    /// Assumes the shutting-down flag is already set and the scheduler is
    /// cancelled. Waits up to `drain_timeout` for leases to come home,
    /// then proceeds regardless.
    pub(crate) async fn shutdown(self: &Arc<Self>) -> Result<()> {
        let _lifecycle = self.lifecycle.lock().await;

        let deadline = tokio::time::Instant::now() + self.config.drain_timeout;
        loop {
            // `enable()` registers the waiter up front; a `Notified`
            // future only picks up `notify_waiters` once polled or
            // enabled, so a return landing between the count read and
            // the await would otherwise be lost.
            let mut notified = std::pin::pin!(self.returned.notified());
            notified.as_mut().enable();
            let outstanding = self.state.lock().unwrap().in_use.len();
            if outstanding == 0 {
                break;
            }
            log::debug!("Waiting for {} outstanding lease(s)", outstanding);
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                let outstanding = self.state.lock().unwrap().in_use.len();
                log::warn!(
                    "Drain timeout expired with {} lease(s) still out; proceeding",
                    outstanding
                );
                break;
            }
        }

        let session = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.available.clear();
            state.in_use.clear();
            state.session.take()
        };

        if let Some(session) = session {
            let closed = tokio::task::spawn_blocking(move || session.close())
                .await
                .map_err(|e| TabPoolError::Shutdown(format!("close task failed: {e}")))?;
            if let Err(e) = closed {
                log::error!("Session close failed during shutdown: {}", e);
                return Err(TabPoolError::Shutdown(e.to_string()));
            }
        }

        log::info!("Tab pool shut down");
        Ok(())
    }

    /// Snapshot current occupancy.
    pub(crate) fn stats(&self) -> PoolStats {
        let state = self.state.lock().unwrap();
        PoolStats {
            available: state.available.len(),
            in_use: state.in_use.len(),
            target: self.config.target_size,
        }
    }

    /// The pool's configuration.
    pub(crate) fn config(&self) -> &TabPoolConfig {
        &self.config
    }

    /// Whether shutdown has begun.
    pub(crate) fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Flag the pool as shutting down. Returns the previous value.
    pub(crate) fn set_shutting_down(&self) -> bool {
        self.shutting_down.swap(true, Ordering::SeqCst)
    }
}

// ============================================================================
// Public Pool API
// ============================================================================

/// Thread-safe, bounded pool of browser tabs parked on a translation page.
///
/// An explicit instance: build as many pools as you need and share each
/// behind an `Arc` (see [`SharedTabPool`](crate::SharedTabPool)). All
/// methods take `&self`.
///
/// # Lifecycle
///
/// 1. [`builder()`](Self::builder) constructs the pool (no browser work).
/// 2. [`init()`](Self::init) opens the session, provisions tabs and
///    starts the refresh scheduler.
/// 3. [`acquire()`](Self::acquire) / lease drop serve steady-state
///    traffic while the scheduler recycles the session periodically.
/// 4. [`shutdown()`](Self::shutdown) stops the scheduler, drains leases
///    and tears the session down.
///
/// # Example
///
/// ```rust,ignore
/// let pool = TabPool::builder()
///     .config(TabPoolConfigBuilder::new().target_size(3).build()?)
///     .driver(Box::new(ChromeSessionDriver::launcher(false)))
///     .build()?;
/// pool.init().await?;
///
/// match pool.acquire() {
///     Some(tab) => { /* drive the page */ }
///     None => { /* exhausted: retry later */ }
/// }
///
/// pool.shutdown().await?;
/// ```
pub struct TabPool {
    /// Shared internal state.
    inner: Arc<TabPoolInner>,

    /// The recycle timer, present between init and shutdown.
    scheduler: Mutex<Option<RefreshScheduler>>,

    /// Whether init starts the scheduler (disabled in some tests).
    enable_refresh: bool,
}

impl TabPool {
    /// Create a builder for constructing a pool.
    pub fn builder() -> TabPoolBuilder {
        TabPoolBuilder::new()
    }

    /// Open the browser session, provision tabs and start the refresh
    /// scheduler.
    ///
    /// Partial provisioning success still yields a running pool; see
    /// [`stats()`](Self::stats) to observe a degraded state. Call once;
    /// subsequent calls log a warning and do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Init`] if the browser session cannot be
    /// established. Nothing is left running in that case.
    pub async fn init(&self) -> Result<()> {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            log::warn!("TabPool::init called twice; ignoring");
            return Ok(());
        }

        if let Err(e) = self.inner.initialize().await {
            // A failed session open may be retried.
            self.inner.initialized.store(false, Ordering::SeqCst);
            return Err(e);
        }

        if self.enable_refresh {
            let scheduler = RefreshScheduler::start(
                Arc::clone(&self.inner),
                self.inner.config().refresh_interval,
            );
            *self.scheduler.lock().unwrap() = Some(scheduler);
        } else {
            log::debug!("Refresh scheduler disabled");
        }

        Ok(())
    }

    /// Lease a tab, or `None` if the pool is exhausted, uninitialized or
    /// shutting down.
    ///
    /// Non-blocking and never queues. The most recently returned tab is
    /// handed out first, keeping busy tabs warm.
    pub fn acquire(&self) -> Option<TabLease> {
        self.inner.acquire()
    }

    /// Snapshot current occupancy.
    pub fn stats(&self) -> PoolStats {
        self.inner.stats()
    }

    /// Recycle the browser session immediately.
    ///
    /// Same operation the scheduler runs on its timer: outstanding leases
    /// are written off and every tab is re-provisioned in a fresh session.
    pub async fn refresh(&self) {
        self.inner.recycle().await;
    }

    /// Gracefully shut the pool down.
    ///
    /// Cancels the refresh scheduler (waiting out an in-flight recycle),
    /// refuses new leases, waits up to the configured drain timeout for
    /// outstanding leases to return, then tears the session down.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Shutdown`] if session teardown fails. The
    /// pool is stopped either way.
    pub async fn shutdown(&self) -> Result<()> {
        if self.inner.set_shutting_down() {
            log::debug!("Shutdown already in progress");
        } else {
            log::info!("Shutting down tab pool...");
        }

        let scheduler = self.scheduler.lock().unwrap().take();
        if let Some(scheduler) = scheduler {
            scheduler.cancel().await;
        }

        self.inner.shutdown().await
    }

    /// Wrap the pool in an [`Arc`] for sharing across tasks and handlers.
    pub fn into_shared(self) -> Arc<TabPool> {
        Arc::new(self)
    }
}

impl Drop for TabPool {
    /// Last-resort cleanup for pools dropped without [`shutdown()`].
    ///
    /// Aborts the scheduler and flags the pool so stray leases discard
    /// their tabs. The browser session itself is torn down when its last
    /// handle drops; a clean drain needs the async shutdown path.
    ///
    /// [`shutdown()`]: TabPool::shutdown
    fn drop(&mut self) {
        if !self.inner.set_shutting_down() {
            log::warn!("TabPool dropped without shutdown(); aborting refresh scheduler");
            if let Some(scheduler) = self.scheduler.lock().unwrap().take() {
                scheduler.abort();
            }
        }
    }
}

impl std::fmt::Debug for TabPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabPool")
            .field("stats", &self.stats())
            .field("shutting_down", &self.inner.is_shutting_down())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Pool Builder
// ============================================================================

/// Builder for [`TabPool`].
///
/// # Required
///
/// A [`SessionDriver`] must be provided; everything else has defaults.
///
/// # Example
///
/// ```rust,ignore
/// let pool = TabPool::builder()
///     .config(TabPoolConfigBuilder::new().target_size(3).build()?)
///     .driver(Box::new(ChromeSessionDriver::launcher(false)))
///     .build()?;
/// ```
pub struct TabPoolBuilder {
    config: TabPoolConfig,
    driver: Option<Box<dyn SessionDriver>>,
    enable_refresh: bool,
}

impl TabPoolBuilder {
    /// Create a builder with default configuration and no driver.
    pub fn new() -> Self {
        Self {
            config: TabPoolConfig::default(),
            driver: None,
            enable_refresh: true,
        }
    }

    /// Set the pool configuration.
    pub fn config(mut self, config: TabPoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the session driver (required).
    pub fn driver(mut self, driver: Box<dyn SessionDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Enable or disable the refresh scheduler.
    ///
    /// Enabled by default. Disable in tests that want full control over
    /// when recycles happen.
    pub fn enable_refresh(mut self, enable: bool) -> Self {
        self.enable_refresh = enable;
        self
    }

    /// Build the pool. No browser work happens until
    /// [`init()`](TabPool::init).
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Configuration`] if no driver was provided.
    pub fn build(self) -> Result<TabPool> {
        let driver = self.driver.ok_or_else(|| {
            TabPoolError::Configuration(
                "driver is required (use ChromeSessionDriver or a mock)".to_string(),
            )
        })?;

        Ok(TabPool {
            inner: TabPoolInner::new(self.config, driver),
            scheduler: Mutex::new(None),
            enable_refresh: self.enable_refresh,
        })
    }
}

impl Default for TabPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Convenience Constructor (feature-gated)
// ============================================================================

/// Build, initialize and share a pool from environment configuration.
///
/// Reads configuration via [`config::env::from_env`](crate::config::env),
/// wires up a [`ChromeSessionDriver`](crate::ChromeSessionDriver)
/// (honoring `CHROME_PATH` and `TAB_POOL_REMOTE_ENDPOINT`), initializes
/// the pool and returns it behind an `Arc`.
///
/// This is a convenience wrapper over the builder, not a singleton: call
/// it twice and you get two independent pools.
///
/// # Errors
///
/// Returns [`TabPoolError::Configuration`] for invalid environment values
/// and [`TabPoolError::Init`] if the browser session cannot be opened.
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::init_tab_pool;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = init_tab_pool().await?;
///     // hand `pool` to your web framework's state
///     Ok(())
/// }
/// ```
#[cfg(feature = "env-config")]
pub async fn init_tab_pool() -> Result<crate::SharedTabPool> {
    use crate::driver::ChromeSessionDriver;

    let config = crate::config::env::from_env()?;

    let driver = match crate::config::env::chrome_path_from_env() {
        Some(path) if config.remote_endpoint.is_none() => {
            ChromeSessionDriver::launcher_with_path(path, config.debug_mode)
                .navigation_timeout(config.navigation_timeout)
        }
        _ => ChromeSessionDriver::from_config(&config),
    };

    let pool = TabPool::builder()
        .config(config)
        .driver(Box::new(driver))
        .build()?;
    pool.init().await?;

    Ok(pool.into_shared())
}

// ============================================================================
// Unit Tests
// ============================================================================
