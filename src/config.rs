//! Configuration for pool size, page behavior and lifecycle timing.
//!
//! This module provides [`TabPoolConfig`] and [`TabPoolConfigBuilder`] for
//! configuring the number of tabs, the translation page they are parked on,
//! the resource blocklist, and the refresh/shutdown timing.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use translate_tab_pool::TabPoolConfigBuilder;
//!
//! let config = TabPoolConfigBuilder::new()
//!     .target_size(8)
//!     .refresh_interval(Duration::from_secs(1800))
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.target_size, 8);
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be loaded
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use translate_tab_pool::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See the [`mod@env`] module for available environment variables.

use std::time::Duration;

use crate::filter::ResourceFilter;

/// Default translation page every pooled tab is parked on.
pub const DEFAULT_PAGE_URL: &str = "https://translate.google.com/?sl=auto&tl=en";

/// Default CSS selector for the consent dialog's accept button.
pub const DEFAULT_CONSENT_SELECTOR: &str = "button[aria-label=\"Accept all\"]";

/// Configuration for tab pool behavior and limits.
///
/// Use [`TabPoolConfigBuilder`] for validation and convenience.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `target_size` | 5 | Tabs provisioned per session |
/// | `remote_endpoint` | None | Attach to a running browser |
/// | `refresh_interval` | 1 hour | Whole-session recycle cadence |
/// | `debug_mode` | false | Run the browser with a visible window |
/// | `page_url` | Google Translate | Page each tab is parked on |
/// | `consent_selector` | accept-all button | Consent dialog dismissal |
/// | `blocked_resources` | image, stylesheet, font | Request blocklist |
/// | `navigation_timeout` | 30s | Per-tab navigation limit |
/// | `settle_delay` | 500ms | Idle window after navigation |
/// | `consent_timeout` | 2s | Wait for the consent button |
/// | `drain_timeout` | 10s | Shutdown wait for leased tabs |
#[derive(Debug, Clone)]
pub struct TabPoolConfig {
    /// Number of tabs to provision per browser session (the pool bound).
    ///
    /// This is a hard upper bound: available plus leased tabs never exceed
    /// it. Fewer tabs may exist after partial provisioning failures.
    pub target_size: usize,

    /// WebSocket debugging endpoint of an already-running browser.
    ///
    /// When set, the pool attaches to that browser instead of launching
    /// its own. Useful for containerized Chrome or debugging against a
    /// visible instance.
    pub remote_endpoint: Option<String>,

    /// Interval between whole-session recycles.
    ///
    /// Long-lived translation tabs accumulate page state and memory; the
    /// refresh scheduler tears the session down and provisions a fresh one
    /// at this cadence. The first recycle fires one full interval after
    /// initialization.
    pub refresh_interval: Duration,

    /// Run the browser with a visible window.
    ///
    /// Headless is the default; debug mode is for watching the tabs drive
    /// the page during development.
    pub debug_mode: bool,

    /// URL of the translation page each tab navigates to at provisioning.
    pub page_url: String,

    /// CSS selector for the consent dialog's accept button.
    ///
    /// Tried once per tab during provisioning. A missing dialog is normal
    /// (regions without consent requirements, or an already-accepted
    /// profile) and only produces a warning.
    pub consent_selector: String,

    /// Resource kinds aborted by the per-tab request filter.
    pub blocked_resources: ResourceFilter,

    /// Maximum time for a provisioning navigation to complete.
    pub navigation_timeout: Duration,

    /// Fixed idle window after navigation before a tab is considered ready.
    ///
    /// The translation page finishes wiring its input handlers shortly
    /// after the navigation settles; this delay absorbs that.
    pub settle_delay: Duration,

    /// Maximum time to wait for the consent button before giving up.
    pub consent_timeout: Duration,

    /// Maximum time shutdown waits for leased tabs to be returned.
    ///
    /// On expiry the outstanding leases are abandoned and teardown
    /// proceeds anyway.
    pub drain_timeout: Duration,
}

impl Default for TabPoolConfig {
    /// Production-ready default configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use translate_tab_pool::TabPoolConfig;
    ///
    /// let config = TabPoolConfig::default();
    ///
    /// assert_eq!(config.target_size, 5);
    /// assert!(config.remote_endpoint.is_none());
    /// assert_eq!(config.refresh_interval, Duration::from_secs(3600));
    /// assert!(!config.debug_mode);
    /// ```
    fn default() -> Self {
        Self {
            target_size: 5,
            remote_endpoint: None,
            refresh_interval: Duration::from_secs(3600), // 1 hour
            debug_mode: false,
            page_url: DEFAULT_PAGE_URL.to_string(),
            consent_selector: DEFAULT_CONSENT_SELECTOR.to_string(),
            blocked_resources: ResourceFilter::default(),
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(500),
            consent_timeout: Duration::from_secs(2),
            drain_timeout: Duration::from_secs(10),
        }
    }
}

/// Builder for [`TabPoolConfig`] with validation.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use translate_tab_pool::TabPoolConfigBuilder;
///
/// let config = TabPoolConfigBuilder::new()
///     .target_size(3)
///     .debug_mode(true)
///     .drain_timeout(Duration::from_secs(5))
///     .build()
///     .expect("Invalid configuration");
/// ```
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - `target_size` must be greater than 0
/// - `refresh_interval` must be non-zero
/// - `page_url` must parse as an absolute URL
/// - `consent_selector` must be non-empty
pub struct TabPoolConfigBuilder {
    config: TabPoolConfig,
}

impl TabPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: TabPoolConfig::default(),
        }
    }

    /// Set the number of tabs provisioned per session (must be > 0).
    pub fn target_size(mut self, size: usize) -> Self {
        self.config.target_size = size;
        self
    }

    /// Attach to a running browser instead of launching one.
    ///
    /// # Parameters
    ///
    /// * `endpoint` - WebSocket debugging URL, e.g. `ws://127.0.0.1:9222/...`.
    pub fn remote_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.remote_endpoint = Some(endpoint.into());
        self
    }

    /// Set the whole-session recycle interval.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.config.refresh_interval = interval;
        self
    }

    /// Run the browser with a visible window.
    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.config.debug_mode = enabled;
        self
    }

    /// Set the translation page URL tabs are parked on.
    pub fn page_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.page_url = url.into();
        self
    }

    /// Set the consent dialog selector.
    pub fn consent_selector<S: Into<String>>(mut self, selector: S) -> Self {
        self.config.consent_selector = selector.into();
        self
    }

    /// Set the resource blocklist installed on every tab.
    pub fn blocked_resources(mut self, filter: ResourceFilter) -> Self {
        self.config.blocked_resources = filter;
        self
    }

    /// Set the per-tab navigation timeout.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    /// Set the post-navigation settle delay.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set the consent button wait limit.
    pub fn consent_timeout(mut self, timeout: Duration) -> Self {
        self.config.consent_timeout = timeout;
        self
    }

    /// Set the shutdown drain timeout.
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.config.drain_timeout = timeout;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - Returns error if `target_size` is 0
    /// - Returns error if `refresh_interval` is zero
    /// - Returns error if `page_url` is not a valid absolute URL
    /// - Returns error if `consent_selector` is empty
    ///
    /// # Example
    ///
    /// ```rust
    /// use translate_tab_pool::TabPoolConfigBuilder;
    ///
    /// let config = TabPoolConfigBuilder::new().target_size(0).build();
    /// assert!(config.is_err());
    /// ```
    pub fn build(self) -> std::result::Result<TabPoolConfig, String> {
        if self.config.target_size == 0 {
            return Err("target_size must be greater than 0".to_string());
        }

        if self.config.refresh_interval.is_zero() {
            return Err("refresh_interval must be non-zero".to_string());
        }

        if let Err(e) = url::Url::parse(&self.config.page_url) {
            return Err(format!("page_url is not a valid URL: {e}"));
        }

        if self.config.consent_selector.trim().is_empty() {
            return Err("consent_selector must not be empty".to_string());
        }

        Ok(self.config)
    }
}

impl Default for TabPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment File
///
/// Uses `dotenvy` to load variables from an `app.env` file in the current
/// directory. The file is optional; if not found, environment variables and
/// defaults are used.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `TAB_POOL_SIZE` | usize | 5 | Tabs per session |
/// | `TAB_POOL_REMOTE_ENDPOINT` | String | unset | Attach instead of launch |
/// | `TAB_POOL_REFRESH_SECONDS` | u64 | 3600 | Recycle interval |
/// | `TAB_POOL_DEBUG_MODE` | bool | false | Visible browser window |
/// | `TAB_POOL_PAGE_URL` | String | Google Translate | Parked page |
/// | `TAB_POOL_CONSENT_SELECTOR` | String | accept-all button | Consent button |
/// | `TAB_POOL_BLOCKED_RESOURCES` | list | image,stylesheet,font | Comma-separated kinds |
/// | `TAB_POOL_DRAIN_SECONDS` | u64 | 10 | Shutdown drain wait |
/// | `CHROME_PATH` | String | auto | Custom Chrome binary path |
///
/// # Example `app.env` File
///
/// ```text
/// TAB_POOL_SIZE=5
/// TAB_POOL_REFRESH_SECONDS=3600
/// TAB_POOL_BLOCKED_RESOURCES=image,stylesheet,font,media
///
/// # Chrome Configuration (optional)
/// # CHROME_PATH=/usr/bin/google-chrome
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::TabPoolError;
    use crate::filter::ResourceKind;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    ///
    /// Automatically called by [`from_env`]; call it explicitly if you need
    /// the file loaded earlier or want to check for errors.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)` if the file was found and loaded successfully
    /// - `Err(dotenvy::Error)` if the file was not found or couldn't be parsed
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads configuration with sensible defaults; unparsable values fall
    /// back to their defaults rather than failing. Also loads `app.env` if
    /// present (via `dotenvy`).
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Configuration`] if the resulting
    /// configuration fails validation (e.g. `TAB_POOL_SIZE=0`).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use translate_tab_pool::config::env::from_env;
    ///
    /// let config = from_env()?;
    /// ```
    pub fn from_env() -> Result<TabPoolConfig, TabPoolError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let target_size = std::env::var("TAB_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let remote_endpoint = std::env::var("TAB_POOL_REMOTE_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let refresh_seconds = std::env::var("TAB_POOL_REFRESH_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600u64);

        let debug_mode = std::env::var("TAB_POOL_DEBUG_MODE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false);

        let page_url =
            std::env::var("TAB_POOL_PAGE_URL").unwrap_or_else(|_| DEFAULT_PAGE_URL.to_string());

        let consent_selector = std::env::var("TAB_POOL_CONSENT_SELECTOR")
            .unwrap_or_else(|_| DEFAULT_CONSENT_SELECTOR.to_string());

        let blocked_resources = std::env::var("TAB_POOL_BLOCKED_RESOURCES")
            .ok()
            .map(|list| {
                let kinds: Vec<ResourceKind> = list
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .filter_map(|s| match s.parse() {
                        Ok(kind) => Some(kind),
                        Err(e) => {
                            log::warn!("Ignoring blocklist entry: {}", e);
                            None
                        }
                    })
                    .collect();
                ResourceFilter::block(kinds)
            })
            .unwrap_or_default();

        let drain_seconds = std::env::var("TAB_POOL_DRAIN_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10u64);

        log::info!("Loading tab pool configuration from environment:");
        log::info!("   - Target size: {}", target_size);
        log::info!(
            "   - Remote endpoint: {}",
            remote_endpoint.as_deref().unwrap_or("(launch locally)")
        );
        log::info!(
            "   - Refresh interval: {}s ({}min)",
            refresh_seconds,
            refresh_seconds / 60
        );
        log::info!("   - Debug mode: {}", debug_mode);
        log::info!("   - Page URL: {}", page_url);
        log::info!("   - Drain timeout: {}s", drain_seconds);

        let mut builder = TabPoolConfigBuilder::new()
            .target_size(target_size)
            .refresh_interval(Duration::from_secs(refresh_seconds))
            .debug_mode(debug_mode)
            .page_url(page_url)
            .consent_selector(consent_selector)
            .blocked_resources(blocked_resources)
            .drain_timeout(Duration::from_secs(drain_seconds));

        if let Some(endpoint) = remote_endpoint {
            builder = builder.remote_endpoint(endpoint);
        }

        builder.build().map_err(TabPoolError::Configuration)
    }

    /// Get Chrome path from environment.
    ///
    /// Reads the `CHROME_PATH` environment variable.
    ///
    /// **Note:** Call [`from_env`] or [`load_env_file`] first to ensure
    /// `app.env` is loaded if you're using a configuration file.
    ///
    /// # Returns
    ///
    /// - `Some(path)` if `CHROME_PATH` is set
    /// - `None` if not set (the launcher auto-detects)
    pub fn chrome_path_from_env() -> Option<String> {
        std::env::var("CHROME_PATH").ok()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
