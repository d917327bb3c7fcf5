//! Chrome/Chromium driver implementation.
//!
//! This module provides [`ChromeSessionDriver`], which backs the pool with
//! a real Chrome browser via `headless_chrome`. The driver either launches
//! its own process or attaches to an already-running browser over its
//! WebSocket debugging endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use translate_tab_pool::ChromeSessionDriver;
//!
//! // Launch a headless Chrome, auto-detecting the binary
//! let driver = ChromeSessionDriver::launcher(false);
//!
//! // Or attach to a container-hosted browser
//! let driver = ChromeSessionDriver::remote("ws://127.0.0.1:9222/devtools/browser/abc");
//! ```

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::{FailRequest, RequestPattern, RequestStage};
use headless_chrome::protocol::cdp::Network;
use headless_chrome::{Browser, LaunchOptions, Tab};

use super::{BrowserSession, SessionDriver, SessionTab};
use crate::config::TabPoolConfig;
use crate::error::{Result, TabPoolError};
use crate::filter::{ResourceFilter, ResourceKind};

/// How the driver obtains its browser.
enum SessionTarget {
    /// Launch a fresh Chrome process.
    Launch {
        chrome_path: Option<String>,
        headless: bool,
    },
    /// Attach to a running browser's debugging endpoint.
    Attach { endpoint: String },
}

/// Driver backing the pool with Chrome/Chromium.
///
/// Supports launching a local process (headless by default, visible in
/// debug mode) or attaching to a remote browser. Each [`open`] call
/// produces an independent session; the pool opens one per refresh cycle.
///
/// [`open`]: SessionDriver::open
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::ChromeSessionDriver;
///
/// // Headless launch with auto-detected Chrome
/// let driver = ChromeSessionDriver::launcher(false);
///
/// // Visible window for watching the tabs during development
/// let driver = ChromeSessionDriver::launcher(true);
///
/// // Non-standard binary location
/// let driver = ChromeSessionDriver::launcher_with_path(
///     "/usr/bin/chromium".to_string(),
///     false,
/// );
/// ```
pub struct ChromeSessionDriver {
    target: SessionTarget,
    navigation_timeout: Option<Duration>,
}

impl ChromeSessionDriver {
    /// Create a driver that launches Chrome, auto-detecting the binary.
    ///
    /// # Parameters
    ///
    /// * `debug_mode` - Run with a visible window instead of headless.
    pub fn launcher(debug_mode: bool) -> Self {
        log::debug!("Creating ChromeSessionDriver (launch, auto-detect binary)");
        Self {
            target: SessionTarget::Launch {
                chrome_path: None,
                headless: !debug_mode,
            },
            navigation_timeout: None,
        }
    }

    /// Create a launching driver with a custom Chrome binary path.
    ///
    /// Use this when Chrome is installed in a non-standard location.
    pub fn launcher_with_path(chrome_path: String, debug_mode: bool) -> Self {
        log::debug!(
            "Creating ChromeSessionDriver (launch, binary: {})",
            chrome_path
        );
        Self {
            target: SessionTarget::Launch {
                chrome_path: Some(chrome_path),
                headless: !debug_mode,
            },
            navigation_timeout: None,
        }
    }

    /// Create a driver that attaches to a running browser.
    ///
    /// # Parameters
    ///
    /// * `endpoint` - WebSocket debugging URL, e.g.
    ///   `ws://127.0.0.1:9222/devtools/browser/<id>`.
    pub fn remote<S: Into<String>>(endpoint: S) -> Self {
        let endpoint = endpoint.into();
        log::debug!("Creating ChromeSessionDriver (attach to {})", endpoint);
        Self {
            target: SessionTarget::Attach { endpoint },
            navigation_timeout: None,
        }
    }

    /// Build a driver matching a pool configuration.
    ///
    /// Attaches when `remote_endpoint` is set, launches otherwise, and
    /// carries over the configured navigation timeout.
    pub fn from_config(config: &TabPoolConfig) -> Self {
        let driver = match &config.remote_endpoint {
            Some(endpoint) => Self::remote(endpoint.clone()),
            None => Self::launcher(config.debug_mode),
        };
        driver.navigation_timeout(config.navigation_timeout)
    }

    /// Set the default timeout applied to every tab's navigations and
    /// element waits.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = Some(timeout);
        self
    }

    /// Set the Chrome binary path on a launching driver.
    ///
    /// No effect on attaching drivers.
    pub fn with_chrome_path(mut self, path: String) -> Self {
        if let SessionTarget::Launch { chrome_path, .. } = &mut self.target {
            *chrome_path = Some(path);
        }
        self
    }
}

impl SessionDriver for ChromeSessionDriver {
    /// Launch or attach to Chrome.
    ///
    /// # Errors
    ///
    /// * Returns [`TabPoolError::Configuration`] if launch options cannot be built.
    /// * Returns [`TabPoolError::Init`] if the browser fails to start or connect.
    fn open(&self) -> Result<Arc<dyn BrowserSession>> {
        let browser = match &self.target {
            SessionTarget::Launch {
                chrome_path,
                headless,
            } => {
                let options = create_session_options(chrome_path.as_deref(), *headless)
                    .map_err(|e| TabPoolError::Configuration(e.to_string()))?;

                log::debug!("Launching Chrome (headless: {})", headless);
                Browser::new(options).map_err(|e| {
                    log::error!("Chrome launch failed: {}", e);
                    TabPoolError::Init(e.to_string())
                })?
            }
            SessionTarget::Attach { endpoint } => {
                log::debug!("Attaching to browser at {}", endpoint);
                Browser::connect(endpoint.clone()).map_err(|e| {
                    log::error!("Attach to {} failed: {}", endpoint, e);
                    TabPoolError::Init(e.to_string())
                })?
            }
        };

        Ok(Arc::new(ChromeSession {
            browser,
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

/// A live Chrome instance.
struct ChromeSession {
    browser: Browser,
    navigation_timeout: Option<Duration>,
}

impl BrowserSession for ChromeSession {
    fn new_tab(&self) -> Result<Arc<dyn SessionTab>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| TabPoolError::Tab(format!("new_tab failed: {e}")))?;

        if let Some(timeout) = self.navigation_timeout {
            tab.set_default_timeout(timeout);
        }

        Ok(Arc::new(ChromeTab { tab }))
    }

    fn close(&self) -> Result<()> {
        // headless_chrome tears the process down when the last Browser
        // handle drops; there is nothing to do eagerly here.
        log::debug!("Releasing Chrome session (process exits with the last handle)");
        Ok(())
    }
}

/// A single Chrome tab driven over CDP.
struct ChromeTab {
    tab: Arc<Tab>,
}

impl SessionTab for ChromeTab {
    fn set_cache_enabled(&self, enabled: bool) -> Result<()> {
        self.tab
            .call_method(Network::SetCacheDisabled {
                cache_disabled: !enabled,
            })
            .map_err(|e| TabPoolError::Tab(format!("cache toggle failed: {e}")))?;
        Ok(())
    }

    fn intercept_requests(&self, filter: ResourceFilter) -> Result<()> {
        if filter.is_empty() {
            return Ok(());
        }

        let patterns = vec![RequestPattern {
            url_pattern: Some("*".to_string()),
            resource_Type: None,
            request_stage: Some(RequestStage::Request),
        }];

        self.tab
            .enable_fetch(Some(&patterns), None)
            .map_err(|e| TabPoolError::Tab(format!("enable_fetch failed: {e}")))?;

        let interceptor: Arc<dyn RequestInterceptor + Send + Sync> =
            Arc::new(ResourceInterceptor { filter });

        self.tab
            .enable_request_interception(interceptor)
            .map_err(|e| TabPoolError::Tab(format!("request interception failed: {e}")))?;

        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| TabPoolError::Tab(format!("navigation to {url} failed: {e}")))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| TabPoolError::Tab(format!("navigation to {url} did not settle: {e}")))?;
        Ok(())
    }

    fn query_text(&self, selector: &str, timeout: Duration) -> Result<String> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| TabPoolError::Tab(format!("element {selector} not found: {e}")))?;
        element
            .get_inner_text()
            .map_err(|e| TabPoolError::Tab(format!("reading {selector} failed: {e}")))
    }

    fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| TabPoolError::Tab(format!("element {selector} not found: {e}")))?;
        element
            .click()
            .map_err(|e| TabPoolError::Tab(format!("click on {selector} failed: {e}")))?;
        Ok(())
    }
}

/// Maps paused requests through a [`ResourceFilter`], aborting blocked
/// kinds before they reach the network.
struct ResourceInterceptor {
    filter: ResourceFilter,
}

impl RequestInterceptor for ResourceInterceptor {
    fn intercept(
        &self,
        _transport: Arc<Transport>,
        _session_id: SessionId,
        event: RequestPausedEvent,
    ) -> RequestPausedDecision {
        let kind = resource_kind(&event.params.resource_Type);
        if self.filter.allows(kind) {
            RequestPausedDecision::Continue(None)
        } else {
            log::trace!("Aborting {} request: {}", kind, event.params.request.url);
            RequestPausedDecision::Fail(FailRequest {
                request_id: event.params.request_id,
                error_reason: Network::ErrorReason::Aborted,
            })
        }
    }
}

/// Collapse a CDP resource type to the filter's categories.
fn resource_kind(resource_type: &Network::ResourceType) -> ResourceKind {
    match resource_type {
        Network::ResourceType::Document => ResourceKind::Document,
        Network::ResourceType::Script => ResourceKind::Script,
        Network::ResourceType::Image => ResourceKind::Image,
        Network::ResourceType::Stylesheet => ResourceKind::Stylesheet,
        Network::ResourceType::Font => ResourceKind::Font,
        Network::ResourceType::Xhr => ResourceKind::Xhr,
        Network::ResourceType::Fetch => ResourceKind::Fetch,
        Network::ResourceType::Media => ResourceKind::Media,
        _ => ResourceKind::Other,
    }
}

/// Create Chrome launch options for a scraping session.
///
/// The flag set targets stable unattended operation: container-friendly
/// shared memory handling, no GPU pipeline, no background throttling of
/// the parked tabs, and none of the consumer features (extensions, sync,
/// default apps) a scraping browser has no use for.
///
/// # Parameters
///
/// * `chrome_path` - Optional custom Chrome binary path. If None, auto-detects.
/// * `headless` - Whether to run without a visible window.
///
/// # Errors
///
/// Returns error if the options builder fails (rare, usually a bug).
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::create_session_options;
///
/// let options = create_session_options(None, true)?;
/// let options = create_session_options(Some("/usr/bin/chromium"), true)?;
/// ```
pub fn create_session_options(
    chrome_path: Option<&str>,
    headless: bool,
) -> std::result::Result<LaunchOptions<'static>, Box<dyn std::error::Error + Send + Sync>> {
    match chrome_path {
        Some(path) => log::debug!("Creating Chrome options with custom path: {}", path),
        None => log::debug!("Creating Chrome options (auto-detect browser)"),
    }

    let mut builder = LaunchOptions::default_builder();

    if let Some(path) = chrome_path {
        builder.path(Some(path.to_string().into()));
    }

    builder
        .headless(headless)
        .sandbox(false) // required in containers
        .args(vec![
            // Container-friendly memory handling
            "--disable-dev-shm-usage".as_ref(),
            "--disable-crash-reporter".as_ref(),
            // No GPU pipeline needed for DOM scraping
            "--disable-gpu".as_ref(),
            "--disable-software-rasterizer".as_ref(),
            "--disable-accelerated-2d-canvas".as_ref(),
            // Consumer features a scraping browser never uses
            "--disable-extensions".as_ref(),
            "--disable-sync".as_ref(),
            "--disable-default-apps".as_ref(),
            "--no-first-run".as_ref(),
            // The parked tabs are always "background"; keep them running
            "--disable-background-timer-throttling".as_ref(),
            "--disable-backgrounding-occluded-windows".as_ref(),
            "--disable-renderer-backgrounding".as_ref(),
            "--disable-hang-monitor".as_ref(),
            // CDP stability under rapid provisioning
            "--disable-ipc-flooding-protection".as_ref(),
        ])
        .build()
        .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            let path_msg = chrome_path.unwrap_or("auto-detect");
            log::error!(
                "Failed to build Chrome launch options (path: {}): {}",
                path_msg,
                e
            );
            e.into()
        })
}

// ============================================================================
// Unit Tests
// ============================================================================
