//! Browser driver implementations.
//!
//! This module provides the trait seam between the pool and the browser:
//! [`SessionDriver`] opens a [`BrowserSession`], which provisions
//! [`SessionTab`]s. The pool only ever talks to these traits, so its
//! leasing, refresh and shutdown logic is testable without a browser.
//!
//! # Overview
//!
//! | Trait | Responsibility |
//! |-------|----------------|
//! | [`SessionDriver`] | Launch or attach to a browser |
//! | [`BrowserSession`] | Open tabs, tear the browser down |
//! | [`SessionTab`] | Cache control, request filtering, navigation, DOM access |
//!
//! # Available Drivers
//!
//! | Driver | Description |
//! |--------|-------------|
//! | [`ChromeSessionDriver`] | Launches or attaches to Chrome/Chromium |
//! | [`mock::MockSessionDriver`] | For testing (feature-gated) |
//!
//! # Example
//!
//! ```rust,ignore
//! use translate_tab_pool::{ChromeSessionDriver, SessionDriver};
//!
//! let driver = ChromeSessionDriver::launcher(false);
//! let session = driver.open()?;
//! let tab = session.new_tab()?;
//! tab.navigate("https://translate.google.com/?sl=auto&tl=en")?;
//! ```

mod chrome;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{ChromeSessionDriver, create_session_options};

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::filter::ResourceFilter;

/// Opens browser sessions.
///
/// A driver is the pool's only way to obtain a browser. Implementations
/// either launch a fresh process or attach to one that is already running.
///
/// # Thread Safety
///
/// Requires `Send + Sync`: the pool shares the driver across its
/// initialization, refresh and shutdown paths.
pub trait SessionDriver: Send + Sync {
    /// Launch or attach to a browser, returning a live session.
    ///
    /// Called once at pool initialization and once per refresh. The call
    /// blocks until the browser is ready; the pool runs it under
    /// `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Init`](crate::TabPoolError::Init) if the
    /// browser cannot be started or reached.
    fn open(&self) -> Result<Arc<dyn BrowserSession>>;
}

/// A live browser instance owned by the pool.
///
/// One session backs the whole pool; all tabs live inside it and die with
/// it. Sessions are recycled wholesale by the refresh scheduler.
pub trait BrowserSession: Send + Sync {
    /// Open a fresh, blank tab in this session.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Tab`](crate::TabPoolError::Tab) if the tab
    /// cannot be opened.
    fn new_tab(&self) -> Result<Arc<dyn SessionTab>>;

    /// Tear the browser down.
    ///
    /// Best effort: implementations may defer actual process teardown to
    /// the last handle being dropped, but must stop accepting new tabs.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Shutdown`](crate::TabPoolError::Shutdown)
    /// if teardown fails in a reportable way.
    fn close(&self) -> Result<()>;
}

/// A single browser tab.
///
/// The operations cover exactly what provisioning and page-driven
/// translation need. All calls block; run them under `spawn_blocking`
/// from async code.
pub trait SessionTab: Send + Sync {
    /// Enable or disable the browser cache for this tab.
    ///
    /// Pooled tabs run with the cache disabled so every lookup observes
    /// the live page.
    fn set_cache_enabled(&self, enabled: bool) -> Result<()>;

    /// Install a request filter on this tab.
    ///
    /// Requests whose resource kind the filter rejects are aborted before
    /// they hit the network. Installing a filter that blocks nothing is a
    /// no-op.
    fn intercept_requests(&self, filter: ResourceFilter) -> Result<()>;

    /// Navigate the tab and wait for the navigation to complete.
    fn navigate(&self, url: &str) -> Result<()>;

    /// Wait for an element and return its inner text.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Tab`](crate::TabPoolError::Tab) if the
    /// element does not appear within `timeout`.
    fn query_text(&self, selector: &str, timeout: Duration) -> Result<String>;

    /// Wait for an element and click it.
    fn click(&self, selector: &str, timeout: Duration) -> Result<()>;
}
