//! # translate-tab-pool
//!
//! Bounded pool of pre-provisioned headless Chrome tabs for page-driven
//! translation scraping.
//!
//! This crate keeps a fixed number of browser tabs parked on a translation
//! page, leases them out for scraping lookups, and periodically recycles
//! the whole browser session so the parked pages never go stale.
//!
//! ## Features
//!
//! - **Tab Pooling**: Tabs are provisioned once and reused, avoiding the
//!   multi-second page load on every lookup
//! - **Request Filtering**: Images, stylesheets and fonts are aborted at
//!   the network layer so parked tabs stay light
//! - **Session Refresh**: A background timer recycles the browser session
//!   on a fixed interval
//! - **RAII Leases**: Tabs return to the pool automatically via `Drop`,
//!   even on panic
//! - **Graceful Shutdown**: Outstanding leases are drained before the
//!   session is torn down
//! - **Web Framework Integration**: Optional Axum router exposing the
//!   translation service
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         Your Web Application (Axum)         │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │                 TabPool                     │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   Available (parked tabs, LIFO)         │ │
//! │ │   [Tab1] [Tab2] [Tab3]                  │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   In Use (leased tabs)                  │ │
//! │ │   {id → Tab}                            │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   Refresh Scheduler                     │ │
//! │ │   (periodic session recycle)            │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │      One Headless Chrome Session            │
//! │     (managed by headless_chrome crate)      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use translate_tab_pool::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create pool with custom configuration
//!     let config = TabPoolConfigBuilder::new()
//!         .target_size(5)
//!         .refresh_interval(Duration::from_secs(3600))
//!         .build()?;
//!
//!     let pool = TabPool::builder()
//!         .config(config.clone())
//!         .driver(Box::new(ChromeSessionDriver::from_config(&config)))
//!         .build()?;
//!
//!     // Open the session and provision tabs
//!     pool.init().await?;
//!
//!     // Lease a tab
//!     if let Some(tab) = pool.acquire() {
//!         tab.navigate("https://translate.google.com/?sl=auto&tl=en&text=hello")?;
//!         let text = tab.query_text("span[jsname='W297wb']", Duration::from_secs(10))?;
//!         println!("{text}");
//!     } // Tab automatically returned to pool
//!
//!     // Graceful shutdown
//!     pool.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, you can initialize the pool
//! from environment variables (loaded from an `app.env` file or the system
//! environment):
//!
//! ```rust,no_run
//! use translate_tab_pool::init_tab_pool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_tab_pool().await?;
//!     // pool is Arc<TabPool>, ready for web handlers
//!     Ok(())
//! }
//! ```
//!
//! ### Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `TAB_POOL_SIZE` | usize | 5 | Tabs per browser session |
//! | `TAB_POOL_REMOTE_ENDPOINT` | String | unset | Attach to a running browser instead of launching |
//! | `TAB_POOL_REFRESH_SECONDS` | u64 | 3600 | Session recycle interval |
//! | `TAB_POOL_DEBUG_MODE` | bool | false | Launch with a visible window |
//! | `TAB_POOL_PAGE_URL` | String | translate page | URL tabs are parked on |
//! | `TAB_POOL_CONSENT_SELECTOR` | String | accept button | Consent dialog selector |
//! | `TAB_POOL_BLOCKED_RESOURCES` | list | image,stylesheet,font | Comma-separated resource kinds to abort |
//! | `TAB_POOL_DRAIN_SECONDS` | u64 | 10 | Shutdown drain timeout |
//! | `CHROME_PATH` | String | auto | Custom Chrome binary path |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Environment-based configuration (default) |
//! | `axum-integration` | Axum router for the translation service |
//! | `test-utils` | Mock session driver for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, TabPoolError>`](Result):
//!
//! ```rust,ignore
//! use translate_tab_pool::{TabPool, TabPoolError};
//!
//! match pool.init().await {
//!     Ok(()) => {}
//!     Err(TabPoolError::Init(msg)) => {
//!         // Chrome failed to launch or connect
//!         eprintln!("Session open failed: {}", msg);
//!     }
//!     Err(e) => {
//!         eprintln!("Pool error: {}", e);
//!     }
//! }
//! ```
//!
//! ## Testing
//!
//! For testing without Chrome, enable the `test-utils` feature and use
//! [`MockSessionDriver`](driver::mock::MockSessionDriver):
//!
//! ```rust,ignore
//! use translate_tab_pool::driver::mock::MockSessionDriver;
//!
//! let pool = TabPool::builder()
//!     .driver(Box::new(MockSessionDriver::new()))
//!     .enable_refresh(false)
//!     .build()?;
//! ```

#![doc(html_root_url = "https://docs.rs/translate-tab-pool/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod handle;
pub mod pool;
pub mod prelude;
pub mod service;
pub mod stats;

// Internal modules (not publicly exposed)
pub(crate) mod provision;
pub(crate) mod refresh;
pub(crate) mod tab;

// ============================================================================
// Feature-gated modules
// ============================================================================

#[cfg(feature = "axum-integration")]
pub mod integrations;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use config::{TabPoolConfig, TabPoolConfigBuilder};
pub use driver::{BrowserSession, ChromeSessionDriver, SessionDriver, SessionTab};
pub use error::{ProvisionFailure, ProvisionStep, Result, TabPoolError};
pub use filter::{ResourceFilter, ResourceKind};
pub use handle::TabLease;
pub use pool::{TabPool, TabPoolBuilder};
pub use stats::PoolStats;

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, from_env};

#[cfg(feature = "env-config")]
pub use pool::init_tab_pool;

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Shared tab pool type for web frameworks.
///
/// All [`TabPool`] methods take `&self`, so a plain `Arc` is all the
/// sharing a web handler needs.
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::SharedTabPool;
///
/// let pool: SharedTabPool = tab_pool.into_shared();
/// ```
pub type SharedTabPool = std::sync::Arc<TabPool>;
