//! Web framework integrations.
//!
//! This module provides an optional integration with Axum, wiring the tab
//! pool and the translation service into a ready-made router.
//!
//! # Available Integrations
//!
//! | Framework | Feature Flag | Module |
//! |-----------|--------------|--------|
//! | Axum | `axum-integration` | `axum` |
//!
//! # Enabling Integrations
//!
//! Add the feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! translate-tab-pool = { version = "0.1", features = ["axum-integration"] }
//! ```
//!
//! # Common Pattern
//!
//! 1. Create a `TabPool` during application startup
//! 2. Initialize it with `init()`
//! 3. Convert to shared state using `into_shared()`
//! 4. Build the router with [`axum::router`](crate::integrations::axum::router)
//!
//! # Example (Generic Pattern)
//!
//! ```rust,ignore
//! use translate_tab_pool::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create and initialize the pool
//!     let pool = init_tab_pool().await?;
//!
//!     // 2. Pass it to your web framework...
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "axum-integration")]
pub mod axum;
