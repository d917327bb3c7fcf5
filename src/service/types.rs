//! Shared types for the translation service.
//!
//! This module provides framework-agnostic types used by the service
//! functions and the web integrations. These types define the API contract
//! for the translation endpoints.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TranslateRequest`] | A batch of queries to translate |
//! | [`Translation`] | One translated result scraped from the page |
//! | [`LookupOutcome`] | Per-query result or error within a batch |
//! | [`TranslateResponse`] | The full batch response |
//! | [`TranslateServiceError`] | Error types with HTTP status mapping |
//! | [`ErrorResponse`] | JSON error response for API clients |
//! | [`PoolStatsResponse`] | Tab pool statistics |
//! | [`HealthResponse`] | Health check response |
//!
//! # Error Handling
//!
//! All errors are represented by [`TranslateServiceError`], which provides:
//! - Human-readable messages via [`Display`](std::fmt::Display)
//! - HTTP status codes via [`status_code()`](TranslateServiceError::status_code)
//! - Machine-readable codes via [`error_code()`](TranslateServiceError::error_code)
//!
//! ```rust,ignore
//! use translate_tab_pool::service::{TranslateServiceError, ErrorResponse};
//!
//! fn handle_error(err: TranslateServiceError) -> (u16, ErrorResponse) {
//!     let status = err.status_code();
//!     let body = ErrorResponse::from(err);
//!     (status, body)
//! }
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// A batch of queries to translate.
///
/// This is the request body for the translate endpoint. Queries in one
/// batch share a single leased tab, so batching related lookups is much
/// cheaper than sending them one request at a time.
///
/// # Validation
///
/// The batch must contain at least one non-blank query; otherwise the
/// service returns [`TranslateServiceError::EmptyBatch`].
///
/// # HTTP API Usage
///
/// ```text
/// POST /translate
/// Content-Type: application/json
///
/// {
///     "queries": ["hello", "world"]
/// }
/// ```
///
/// # Examples
///
/// ```rust
/// use translate_tab_pool::service::TranslateRequest;
///
/// let request = TranslateRequest {
///     queries: vec!["bonjour".to_string(), "merci".to_string()],
/// };
/// assert!(request.has_queries());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranslateRequest {
    /// The words or phrases to look up, in order.
    ///
    /// Blank entries are skipped during validation but still produce a
    /// per-query error outcome in the response, so positions line up with
    /// what the client sent.
    pub queries: Vec<String>,
}

impl TranslateRequest {
    /// Whether the batch contains at least one non-blank query.
    pub fn has_queries(&self) -> bool {
        self.queries.iter().any(|q| !q.trim().is_empty())
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// One translated result scraped from the translation page.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `text` | `String` | The translated text |
/// | `pronunciation` | `Option<String>` | Romanized pronunciation, when the page shows one |
/// | `definitions` | `Vec<String>` | Dictionary definitions, when present |
/// | `examples` | `Vec<String>` | Usage examples, when present |
///
/// Only `text` is guaranteed; the page omits the other sections for many
/// inputs (phrases, rare words, same-language passthrough).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Translation {
    /// The translated text.
    pub text: String,

    /// Romanized pronunciation, when the page shows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,

    /// Dictionary definitions, when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<String>,

    /// Usage examples, when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Per-query result within a batch response.
///
/// A batch never fails wholesale because one query did: each query gets
/// its own outcome, carrying either a translation or an error message.
/// Exactly one of `translation` and `error` is set.
///
/// # JSON Shape
///
/// ```json
/// { "query": "hello", "translation": { "text": "bonjour" } }
/// { "query": "???", "error": "selector .result not found" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupOutcome {
    /// The query this outcome belongs to, echoed back verbatim.
    pub query: String,

    /// The translation, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,

    /// The error message, on per-query failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupOutcome {
    /// A successful outcome.
    pub fn ok(query: String, translation: Translation) -> Self {
        Self {
            query,
            translation: Some(translation),
            error: None,
        }
    }

    /// A failed outcome.
    pub fn failed(query: String, error: String) -> Self {
        Self {
            query,
            translation: None,
            error: Some(error),
        }
    }

    /// Whether this outcome carries a translation.
    pub fn is_ok(&self) -> bool {
        self.translation.is_some()
    }
}

/// The full batch response.
///
/// Items appear in the same order as the request's queries.
///
/// # HTTP API Usage
///
/// ```text
/// Response (200 OK):
/// {
///     "items": [
///         { "query": "hello", "translation": { "text": "bonjour" } },
///         { "query": "thanks", "translation": { "text": "merci" } }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranslateResponse {
    /// One outcome per query, in request order.
    pub items: Vec<LookupOutcome>,
}

impl TranslateResponse {
    /// Number of queries that produced a translation.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_ok()).count()
    }

    /// Number of queries that produced an error.
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Tab pool statistics response.
///
/// # HTTP API Usage
///
/// ```text
/// GET /pool/stats
///
/// Response:
/// {
///     "available": 3,
///     "in_use": 2,
///     "target": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatsResponse {
    /// Tabs parked and ready to lease.
    pub available: usize,

    /// Tabs currently leased out.
    pub in_use: usize,

    /// Configured tab count per session.
    pub target: usize,
}

impl From<crate::PoolStats> for PoolStatsResponse {
    fn from(stats: crate::PoolStats) -> Self {
        Self {
            available: stats.available,
            in_use: stats.in_use,
            target: stats.target,
        }
    }
}

/// Health check response.
///
/// Simple response indicating the service is running. Used by load
/// balancers and container orchestrators.
///
/// ```text
/// GET /health
///
/// Response (200 OK):
/// {
///     "status": "healthy",
///     "service": "translate-tab-pool"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, always `"healthy"` when the endpoint responds.
    pub status: String,

    /// Service name identifier.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "translate-tab-pool".to_string(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during batch translation.
///
/// Each variant maps to a specific HTTP status code and error code for
/// consistent API responses.
///
/// # HTTP Status Code Mapping
///
/// | Error Type | HTTP Status | Error Code |
/// |------------|-------------|------------|
/// | [`EmptyBatch`](Self::EmptyBatch) | 400 Bad Request | `EMPTY_BATCH` |
/// | [`PoolExhausted`](Self::PoolExhausted) | 503 Service Unavailable | `POOL_EXHAUSTED` |
/// | [`Internal`](Self::Internal) | 500 Internal Server Error | `INTERNAL_ERROR` |
///
/// Per-query scrape failures are not represented here; they live in the
/// matching [`LookupOutcome`] so the rest of the batch still succeeds.
#[derive(Debug, Clone)]
pub enum TranslateServiceError {
    /// The batch contained no usable queries.
    ///
    /// Either `queries` was empty or every entry was blank. The client
    /// must fix the request; retrying does not help.
    EmptyBatch,

    /// No tab is available in the pool.
    ///
    /// All tabs are leased out, or the pool is degraded after losing
    /// slots. Worth retrying after a short delay.
    PoolExhausted,

    /// An unexpected internal error occurred.
    Internal(String),
}

impl std::fmt::Display for TranslateServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "At least one non-blank query is required"),
            Self::PoolExhausted => write!(f, "No tab available, try again shortly"),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateServiceError {}

impl TranslateServiceError {
    /// Returns the HTTP status code for this error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use translate_tab_pool::service::TranslateServiceError;
    ///
    /// assert_eq!(TranslateServiceError::EmptyBatch.status_code(), 400);
    /// assert_eq!(TranslateServiceError::PoolExhausted.status_code(), 503);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyBatch => 400,
            Self::PoolExhausted => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    ///
    /// These codes are stable and returned in the `code` field of error
    /// responses; clients should branch on them rather than parsing the
    /// message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::PoolExhausted => "POOL_EXHAUSTED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` if this error is likely transient and worth
    /// retrying.
    ///
    /// | Error | Retryable | Reason |
    /// |-------|-----------|--------|
    /// | `PoolExhausted` | yes | A lease may come back any moment |
    /// | `EmptyBatch` | no | Client must fix the request |
    /// | `Internal` | no | Needs investigation first |
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted)
    }
}

/// JSON error response for API clients.
///
/// # Response Format
///
/// ```json
/// {
///     "error": "No tab available, try again shortly",
///     "code": "POOL_EXHAUSTED"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message, intended for developers and logs.
    pub error: String,

    /// Machine-readable error code; see
    /// [`TranslateServiceError::error_code()`] for the complete list.
    pub code: String,
}

impl From<&TranslateServiceError> for ErrorResponse {
    fn from(err: &TranslateServiceError) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

impl From<TranslateServiceError> for ErrorResponse {
    fn from(err: TranslateServiceError) -> Self {
        Self::from(&err)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_has_queries() {
        assert!(!TranslateRequest::default().has_queries());
        assert!(
            !TranslateRequest {
                queries: vec!["   ".to_string()],
            }
            .has_queries()
        );
        assert!(
            TranslateRequest {
                queries: vec!["hello".to_string()],
            }
            .has_queries()
        );
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = LookupOutcome::ok(
            "hello".to_string(),
            Translation {
                text: "bonjour".to_string(),
                ..Default::default()
            },
        );
        assert!(ok.is_ok());
        assert!(ok.error.is_none());

        let failed = LookupOutcome::failed("???".to_string(), "no result".to_string());
        assert!(!failed.is_ok());
        assert!(failed.translation.is_none());
    }

    #[test]
    fn test_response_counts() {
        let response = TranslateResponse {
            items: vec![
                LookupOutcome::ok("a".to_string(), Translation::default()),
                LookupOutcome::failed("b".to_string(), "boom".to_string()),
            ],
        };

        assert_eq!(response.succeeded(), 1);
        assert_eq!(response.failed(), 1);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TranslateServiceError::EmptyBatch.status_code(), 400);
        assert_eq!(TranslateServiceError::PoolExhausted.status_code(), 503);
        assert_eq!(
            TranslateServiceError::Internal("".to_string()).status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TranslateServiceError::EmptyBatch.error_code(), "EMPTY_BATCH");
        assert_eq!(
            TranslateServiceError::PoolExhausted.error_code(),
            "POOL_EXHAUSTED"
        );
        assert_eq!(
            TranslateServiceError::Internal("".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(TranslateServiceError::PoolExhausted.is_retryable());
        assert!(!TranslateServiceError::EmptyBatch.is_retryable());
        assert!(!TranslateServiceError::Internal("".to_string()).is_retryable());
    }

    #[test]
    fn test_error_response_from_error() {
        let response = ErrorResponse::from(TranslateServiceError::PoolExhausted);

        assert_eq!(response.code, "POOL_EXHAUSTED");
        assert!(response.error.contains("No tab available"));
    }

    #[test]
    fn test_outcome_json_shape() {
        let ok = LookupOutcome::ok(
            "hello".to_string(),
            Translation {
                text: "bonjour".to_string(),
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&ok).unwrap();

        assert!(json.contains("\"translation\""));
        assert!(!json.contains("\"error\""), "empty fields are omitted");
    }

    #[test]
    fn test_health_response_default() {
        let response = HealthResponse::default();
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "translate-tab-pool");
    }
}
