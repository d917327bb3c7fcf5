//! Mock session driver for testing.
//!
//! This module provides a mock implementation of the driver seam that can
//! be scripted to succeed or fail, useful for testing pool behavior
//! without requiring Chrome to be installed.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use translate_tab_pool::driver::mock::MockSessionDriver;
//!
//! // Driver whose session never comes up
//! let driver = MockSessionDriver::failing_session("Chrome not installed");
//!
//! // Driver whose first two tab creations fail
//! let driver = MockSessionDriver::failing_tabs(2);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BrowserSession, SessionDriver, SessionTab};
use crate::error::{Result, TabPoolError};
use crate::filter::ResourceFilter;

/// Shared script and counters behind a mock driver and its clones.
struct MockPlan {
    /// Error message returned by `open()`, if set.
    fail_open: Option<String>,

    /// Number of initial tab-creation attempts that fail.
    fail_first_tabs: usize,

    /// Whether every `click()` fails (consent-dialog simulation).
    fail_clicks: bool,

    /// Sessions opened so far.
    opens: AtomicUsize,

    /// Sessions closed so far.
    closes: AtomicUsize,

    /// Tab-creation attempts so far (successful or not).
    tab_attempts: AtomicUsize,

    /// Every URL navigated to, in order, across all tabs.
    navigations: Mutex<Vec<String>>,
}

/// Mock session driver for testing without Chrome.
///
/// The driver can be scripted to:
/// - Fail session opening with a specific error
/// - Fail the first N tab creations (partial provisioning)
/// - Fail every click (a consent dialog that never appears)
/// - Track opens, closes, tab attempts and navigations for verification
///
/// Clones share one script and one set of counters, so a test can keep a
/// clone while moving the original into a pool.
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::driver::mock::MockSessionDriver;
///
/// let driver = MockSessionDriver::new();
/// let probe = driver.clone();
///
/// // Move `driver` into a pool, observe through `probe`
/// assert_eq!(probe.open_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockSessionDriver {
    plan: Arc<MockPlan>,
}

impl MockSessionDriver {
    /// Create a mock driver where everything succeeds.
    pub fn new() -> Self {
        Self::with_plan(None, 0, false)
    }

    /// Create a mock driver whose session never opens.
    ///
    /// Useful for testing fatal initialization paths.
    pub fn failing_session<S: Into<String>>(message: S) -> Self {
        Self::with_plan(Some(message.into()), 0, false)
    }

    /// Create a mock driver whose first `n` tab creations fail.
    ///
    /// Subsequent creations succeed, which makes this useful both for
    /// partial-initialization tests and for verifying recovery on refresh.
    pub fn failing_tabs(n: usize) -> Self {
        Self::with_plan(None, n, false)
    }

    /// Create a mock driver where every click fails.
    ///
    /// Simulates a consent dialog that never shows up.
    pub fn failing_clicks() -> Self {
        Self::with_plan(None, 0, true)
    }

    fn with_plan(fail_open: Option<String>, fail_first_tabs: usize, fail_clicks: bool) -> Self {
        Self {
            plan: Arc::new(MockPlan {
                fail_open,
                fail_first_tabs,
                fail_clicks,
                opens: AtomicUsize::new(0),
                closes: AtomicUsize::new(0),
                tab_attempts: AtomicUsize::new(0),
                navigations: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Number of sessions opened through this driver.
    pub fn open_count(&self) -> usize {
        self.plan.opens.load(Ordering::SeqCst)
    }

    /// Number of sessions closed so far.
    pub fn close_count(&self) -> usize {
        self.plan.closes.load(Ordering::SeqCst)
    }

    /// Number of tab-creation attempts, successful or not.
    pub fn tab_attempts(&self) -> usize {
        self.plan.tab_attempts.load(Ordering::SeqCst)
    }

    /// Every URL navigated to so far, in order, across all tabs.
    pub fn navigations(&self) -> Vec<String> {
        self.plan.navigations.lock().unwrap().clone()
    }
}

impl Default for MockSessionDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionDriver for MockSessionDriver {
    /// Open a scripted session or return the scripted failure.
    fn open(&self) -> Result<Arc<dyn BrowserSession>> {
        if let Some(message) = &self.plan.fail_open {
            log::debug!("MockSessionDriver: Returning scripted open failure");
            return Err(TabPoolError::Init(message.clone()));
        }

        self.plan.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockSession {
            plan: Arc::clone(&self.plan),
        }))
    }
}

impl std::fmt::Debug for MockSessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSessionDriver")
            .field("fail_open", &self.plan.fail_open)
            .field("fail_first_tabs", &self.plan.fail_first_tabs)
            .field("fail_clicks", &self.plan.fail_clicks)
            .field("opens", &self.open_count())
            .field("closes", &self.close_count())
            .field("tab_attempts", &self.tab_attempts())
            .finish()
    }
}

/// A scripted browser session.
struct MockSession {
    plan: Arc<MockPlan>,
}

impl BrowserSession for MockSession {
    fn new_tab(&self) -> Result<Arc<dyn SessionTab>> {
        let attempt = self.plan.tab_attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.plan.fail_first_tabs {
            log::debug!("MockSession: Failing tab creation attempt #{}", attempt);
            return Err(TabPoolError::Tab(format!(
                "scripted tab failure (attempt {attempt})"
            )));
        }

        Ok(Arc::new(MockTab {
            plan: Arc::clone(&self.plan),
        }))
    }

    fn close(&self) -> Result<()> {
        self.plan.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A scripted tab that records what is done to it.
struct MockTab {
    plan: Arc<MockPlan>,
}

impl SessionTab for MockTab {
    fn set_cache_enabled(&self, _enabled: bool) -> Result<()> {
        Ok(())
    }

    fn intercept_requests(&self, _filter: ResourceFilter) -> Result<()> {
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.plan.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn query_text(&self, selector: &str, _timeout: Duration) -> Result<String> {
        Ok(format!("text of {selector}"))
    }

    fn click(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if self.plan.fail_clicks {
            return Err(TabPoolError::Tab(format!(
                "scripted click failure on {selector}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
