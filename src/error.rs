//! Error types for the tab pool.
//!
//! This module provides [`TabPoolError`], a unified error type for all pool
//! operations, the structured [`ProvisionFailure`] produced when a single tab
//! cannot be prepared, and a convenient [`Result`] type alias.
//!
//! # Example
//!
//! ```rust
//! use translate_tab_pool::{Result, TabPoolError};
//!
//! fn lookup_word() -> Result<String> {
//!     // Your logic here...
//!     Err(TabPoolError::Configuration("example error".to_string()))
//! }
//!
//! match lookup_word() {
//!     Ok(text) => println!("Translated: {}", text),
//!     Err(TabPoolError::Init(msg)) => eprintln!("Pool never came up: {}", msg),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

/// The provisioning step at which a tab failed to become usable.
///
/// Provisioning runs a fixed sequence per tab; the step is recorded so a
/// failure report can say exactly where a slot was lost. Consent dismissal
/// is deliberately absent: a missed consent dialog is logged as a warning
/// and never fails provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// Opening a fresh tab in the browser session.
    CreateTab,
    /// Disabling the browser cache for the tab.
    DisableCache,
    /// Installing the request filter that aborts heavy resources.
    RequestFilter,
    /// Navigating to the translation page and waiting for it to settle.
    Navigate,
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProvisionStep::CreateTab => "create-tab",
            ProvisionStep::DisableCache => "disable-cache",
            ProvisionStep::RequestFilter => "request-filter",
            ProvisionStep::Navigate => "navigate",
        };
        f.write_str(name)
    }
}

/// A single tab slot that could not be provisioned.
///
/// Carries the slot index within the batch, the [`ProvisionStep`] that
/// failed, and the underlying cause. Initialization and refresh log these
/// and continue with the tabs that did come up.
///
/// # Example
///
/// ```rust
/// use translate_tab_pool::{ProvisionFailure, ProvisionStep};
///
/// let failure = ProvisionFailure {
///     index: 2,
///     step: ProvisionStep::Navigate,
///     cause: "timed out waiting for navigation".to_string(),
/// };
/// println!("{}", failure);
/// // "tab slot 2 failed at navigate: timed out waiting for navigation"
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("tab slot {index} failed at {step}: {cause}")]
pub struct ProvisionFailure {
    /// Zero-based slot index within the provisioning batch.
    pub index: usize,
    /// The step that failed.
    pub step: ProvisionStep,
    /// Description of the underlying error.
    pub cause: String,
}

/// Errors that can occur during tab pool operations.
///
/// Each variant maps to one failure domain of the pool lifecycle: bringing
/// the browser session up, preparing individual tabs, the periodic recycle,
/// teardown, configuration, and driving a leased tab.
#[derive(Debug, thiserror::Error)]
pub enum TabPoolError {
    /// Failed to establish the underlying browser session.
    ///
    /// This is the only fatal initialization error: without a session there
    /// is nothing to provision tabs in.
    ///
    /// # Common Causes
    ///
    /// - Chrome/Chromium binary not found or not installed
    /// - Remote debugging endpoint unreachable or not a WebSocket URL
    /// - Insufficient permissions to execute Chrome
    /// - System resource limits exceeded
    #[error("Failed to establish browser session: {0}")]
    Init(String),

    /// A single tab slot failed provisioning.
    ///
    /// During initialization and refresh these are logged and tolerated;
    /// the variant exists so callers provisioning tabs directly get a
    /// structured result instead of a log line.
    #[error(transparent)]
    Provision(#[from] ProvisionFailure),

    /// A scheduled or manual pool refresh failed.
    ///
    /// The pool keeps running in a degraded state (possibly with zero
    /// available tabs) until the next refresh attempt succeeds.
    #[error("Pool refresh failed: {0}")]
    Refresh(String),

    /// Session teardown during shutdown did not complete cleanly.
    ///
    /// Shutdown is best effort: the error is reported but the pool is
    /// already stopped when you see it.
    #[error("Shutdown did not complete cleanly: {0}")]
    Shutdown(String),

    /// Invalid configuration provided.
    ///
    /// Use [`TabPoolConfigBuilder`](crate::TabPoolConfigBuilder), which
    /// validates configuration at build time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation on a leased tab failed.
    ///
    /// Covers navigation, DOM queries and clicks performed through a
    /// [`TabLease`](crate::TabLease). The tab stays leased; return it and
    /// acquire another if the failure looks permanent.
    #[error("Tab operation failed: {0}")]
    Tab(String),
}

/// Convenience conversion from [`String`] to [`TabPoolError::Configuration`].
impl From<String> for TabPoolError {
    fn from(msg: String) -> Self {
        TabPoolError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`TabPoolError::Configuration`].
///
/// Allows using string literals directly where [`TabPoolError`] is expected.
impl From<&str> for TabPoolError {
    fn from(msg: &str) -> Self {
        TabPoolError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`TabPoolError`].
///
/// This is the standard result type returned by most pool operations.
///
/// # Example
///
/// ```rust
/// use translate_tab_pool::Result;
///
/// fn my_function() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, TabPoolError>;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies error type conversions from String and &str.
    #[test]
    fn test_error_conversion() {
        let error: TabPoolError = "test error".into();
        match error {
            TabPoolError::Configuration(msg) => {
                assert_eq!(msg, "test error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }

        let error: TabPoolError = "another error".to_string().into();
        match error {
            TabPoolError::Configuration(msg) => {
                assert_eq!(msg, "another error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }
    }

    /// Verifies that error Display formatting works correctly.
    #[test]
    fn test_error_display() {
        let error = TabPoolError::Init("chrome not found".to_string());
        assert_eq!(
            error.to_string(),
            "Failed to establish browser session: chrome not found"
        );

        let error = TabPoolError::Refresh("session gone".to_string());
        assert_eq!(error.to_string(), "Pool refresh failed: session gone");

        let error = TabPoolError::Configuration("bad config".to_string());
        assert_eq!(error.to_string(), "Configuration error: bad config");

        let error = TabPoolError::Tab("selector not found".to_string());
        assert_eq!(error.to_string(), "Tab operation failed: selector not found");
    }

    /// Verifies that a provision failure carries its slot and step through
    /// Display and through the transparent error variant.
    #[test]
    fn test_provision_failure_display() {
        let failure = ProvisionFailure {
            index: 3,
            step: ProvisionStep::DisableCache,
            cause: "CDP call failed".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "tab slot 3 failed at disable-cache: CDP call failed"
        );

        let error: TabPoolError = failure.into();
        assert_eq!(
            error.to_string(),
            "tab slot 3 failed at disable-cache: CDP call failed"
        );
        assert!(matches!(error, TabPoolError::Provision(_)));
    }

    /// Verifies step name formatting used in failure reports.
    #[test]
    fn test_provision_step_display() {
        assert_eq!(ProvisionStep::CreateTab.to_string(), "create-tab");
        assert_eq!(ProvisionStep::Navigate.to_string(), "navigate");
    }

    /// Verifies that TabPoolError implements std::error::Error.
    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<TabPoolError>();
        assert_std_error::<ProvisionFailure>();
    }

    /// Verifies that TabPoolError is Send + Sync for thread safety.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TabPoolError>();
    }
}
