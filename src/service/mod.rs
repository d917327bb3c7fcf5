//! Batch translation service module.
//!
//! This module provides the **framework-agnostic core** of the translation
//! service. It contains the shared request/response types, error
//! definitions and the batch translation logic that is reused by the web
//! framework integrations.
//!
//! # Module Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   translate-tab-pool crate                   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              service module (this module)              │  │
//! │  │                                                        │  │
//! │  │  ┌─────────────────────┐  ┌─────────────────────────┐  │  │
//! │  │  │      types.rs       │  │      translate.rs       │  │  │
//! │  │  │ TranslateRequest    │  │ PageTranslator (trait)  │  │  │
//! │  │  │ Translation         │  │ DomTranslator           │  │  │
//! │  │  │ LookupOutcome       │  │ translate_batch()       │  │  │
//! │  │  │ TranslateResponse   │  │ pool_stats()            │  │  │
//! │  │  │ TranslateServiceErr │  │ is_pool_ready()         │  │  │
//! │  │  │ ErrorResponse       │  │                         │  │  │
//! │  │  └─────────────────────┘  └─────────────────────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                             │                                │
//! │                             │ used by                        │
//! │                             ▼                                │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            integrations module (axum handlers)         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Philosophy
//!
//! This module follows the **"thin handler, thick service"** pattern:
//!
//! | Layer | Responsibility | This Module? |
//! |-------|----------------|--------------|
//! | **Service** | Validation, leasing, batch translation | Yes |
//! | **Handler** | HTTP request/response mapping, framework glue | No (integrations) |
//!
//! # Public API Summary
//!
//! ## Types
//!
//! | Type | Purpose | Used By |
//! |------|---------|---------|
//! | `TranslateRequest` | A batch of queries | `POST /translate` |
//! | `TranslateResponse` | Per-query outcomes | `POST /translate` |
//! | `PoolStatsResponse` | Tab pool statistics | `GET /pool/stats` |
//! | `HealthResponse` | Health check response | `GET /health` |
//! | `ErrorResponse` | JSON error response | All endpoints (on error) |
//!
//! ## Core Functions
//!
//! | Function | Purpose | Blocking? |
//! |----------|---------|-----------|
//! | `translate_batch` | Translate a batch on one leased tab | Yes |
//! | `pool_stats` | Get pool statistics | No |
//! | `is_pool_ready` | Check pool readiness | No |
//!
//! # Blocking Behavior
//!
//! [`translate_batch`] drives a browser tab synchronously and must never
//! be called directly from an async context:
//!
//! ```rust,ignore
//! // Correct
//! let result = tokio::task::spawn_blocking(move || {
//!     translate_batch(&pool, translator.as_ref(), &request)
//! }).await;
//! ```
//!
//! # Custom Translators
//!
//! The scrape step sits behind the [`PageTranslator`] trait, so a
//! different page layout (or a test double) plugs in without touching the
//! batch logic:
//!
//! ```rust,ignore
//! struct MyTranslator;
//!
//! impl PageTranslator for MyTranslator {
//!     fn lookup(&self, tab: &dyn SessionTab, query: &str) -> Result<Translation, TabPoolError> {
//!         tab.navigate(&format!("https://my.page/?q={}", urlencoding::encode(query)))?;
//!         let text = tab.query_text("#output", Duration::from_secs(5))?;
//!         Ok(Translation { text, ..Default::default() })
//!     }
//! }
//! ```
//!
//! # See Also
//!
//! - [`crate::pool`] - Tab pool management
//! - [`crate::integrations`] - Framework-specific handlers
//! - [`crate::prelude`] - Convenient re-exports

mod translate;
mod types;

// ============================================================================
// Re-exports: Types
// ============================================================================

pub use types::ErrorResponse;
pub use types::HealthResponse;
pub use types::LookupOutcome;
pub use types::PoolStatsResponse;
pub use types::TranslateRequest;
pub use types::TranslateResponse;
pub use types::TranslateServiceError;
pub use types::Translation;

// ============================================================================
// Re-exports: Translator and Functions
// ============================================================================

pub use translate::DomTranslator;
pub use translate::PageTranslator;
pub use translate::is_pool_ready;
pub use translate::pool_stats;
pub use translate::translate_batch;

// ============================================================================
// Re-exports: Constants
// ============================================================================

pub use translate::DEFAULT_LOOKUP_TIMEOUT;
pub use translate::DEFAULT_PRONUNCIATION_SELECTOR;
pub use translate::DEFAULT_RESULT_SELECTOR;

// ============================================================================
// Module-level tests
// ============================================================================
