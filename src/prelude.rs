//! Convenient imports for common usage patterns.
//!
//! This module re-exports the most commonly used types from
//! `translate-tab-pool`, allowing you to quickly get started with a single
//! import.
//!
//! # Usage
//!
//! ```rust,ignore
//! use translate_tab_pool::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`TabPool`] - Main pool type
//! - [`TabPoolBuilder`] - Pool builder
//! - [`TabPoolConfig`] - Configuration struct
//! - [`TabPoolConfigBuilder`] - Configuration builder
//! - [`TabPoolError`] - Error type
//! - [`Result`] - Result type alias
//! - [`TabLease`] - RAII tab lease
//! - [`PoolStats`] - Pool statistics
//! - [`SessionDriver`] / [`SessionTab`] - Driver traits
//! - [`ChromeSessionDriver`] - Chrome driver
//! - [`ResourceFilter`] / [`ResourceKind`] - Request filtering
//! - [`SharedTabPool`] - Type alias for a shared pool
//!
//! # Example
//!
//! ```rust,ignore
//! use translate_tab_pool::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TabPoolConfigBuilder::new()
//!         .target_size(5)
//!         .build()?;
//!
//!     let pool = TabPool::builder()
//!         .config(config.clone())
//!         .driver(Box::new(ChromeSessionDriver::from_config(&config)))
//!         .build()?;
//!
//!     pool.init().await?;
//!
//!     if let Some(tab) = pool.acquire() {
//!         // ... drive the translation page
//!     }
//!
//!     pool.shutdown().await?;
//!     Ok(())
//! }
//! ```

// Core types
pub use crate::SharedTabPool;
pub use crate::config::{TabPoolConfig, TabPoolConfigBuilder};
pub use crate::driver::{BrowserSession, ChromeSessionDriver, SessionDriver, SessionTab};
pub use crate::error::{Result, TabPoolError};
pub use crate::filter::{ResourceFilter, ResourceKind};
pub use crate::handle::TabLease;
pub use crate::pool::{TabPool, TabPoolBuilder};
pub use crate::stats::PoolStats;

// Service types
pub use crate::service::{
    DomTranslator, PageTranslator, TranslateRequest, TranslateResponse, TranslateServiceError,
    Translation,
};

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::{chrome_path_from_env, from_env};

#[cfg(feature = "env-config")]
pub use crate::pool::init_tab_pool;

// Re-export Arc for convenience (commonly needed with SharedTabPool)
pub use std::sync::Arc;
