//! Core batch translation service (framework-agnostic).
//!
//! This module contains the translation logic shared across all web
//! framework integrations. The functions here are **blocking** and should
//! be called from a blocking context (`tokio::task::spawn_blocking` or
//! similar); they drive a leased browser tab synchronously.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           Framework Integration (axum)        │
//! └──────────────────────┬────────────────────────┘
//!                        │ async context
//!                        ▼
//! ┌───────────────────────────────────────────────┐
//! │                spawn_blocking                 │
//! └──────────────────────┬────────────────────────┘
//!                        │ blocking context
//!                        ▼
//! ┌───────────────────────────────────────────────┐
//! │        translate_batch (this module)          │
//! │   one TabLease per batch, one PageTranslator  │
//! │   lookup per query                            │
//! └──────────────────────┬────────────────────────┘
//!                        │
//!                        ▼
//! ┌───────────────────────────────────────────────┐
//! │          TabPool (headless_chrome)            │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Blocking Behavior
//!
//! ```rust,ignore
//! // Correct: wrap in spawn_blocking
//! let result = tokio::task::spawn_blocking(move || {
//!     translate_batch(&pool, translator.as_ref(), &request)
//! }).await;
//!
//! // Wrong: calling directly in an async handler blocks the runtime
//! ```
//!
//! # Error Handling
//!
//! Batch-level failures (empty batch, no tab available) are returned as
//! [`TranslateServiceError`]. Per-query scrape failures stay inside the
//! response as failed [`LookupOutcome`]s so the rest of the batch is not
//! lost.

use std::time::Duration;

use crate::driver::SessionTab;
use crate::error::TabPoolError;
use crate::pool::TabPool;
use crate::service::types::*;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for the translated text to appear after navigation.
///
/// The result container renders asynchronously after the page URL changes;
/// this bounds how long a single lookup waits for it.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default CSS selector for the translated text container.
pub const DEFAULT_RESULT_SELECTOR: &str = "span[jsname='W297wb']";

/// Default CSS selector for the romanized pronunciation, where shown.
pub const DEFAULT_PRONUNCIATION_SELECTOR: &str = "div[data-location='2'] div";

/// Timeout for the optional sections (pronunciation, definitions,
/// examples).
///
/// Kept short: by the time the result text has rendered, the optional
/// sections are either present or absent for good, so a long wait only
/// slows down queries that legitimately lack them.
const OPTIONAL_SECTION_TIMEOUT: Duration = Duration::from_millis(500);

// ============================================================================
// Translator Trait
// ============================================================================

/// Extracts a translation for one query from a leased tab.
///
/// The pool hands out tabs already parked on the translation page; a
/// translator's job is to steer such a tab to the query's result and
/// scrape it. [`DomTranslator`] is the production implementation; tests
/// substitute their own.
///
/// Implementations are blocking and must be `Send + Sync` so one
/// translator instance can serve all handler threads.
pub trait PageTranslator: Send + Sync {
    /// Look up `query` using `tab`.
    ///
    /// # Errors
    ///
    /// Returns [`TabPoolError::Tab`] for navigation and scrape failures.
    /// The caller converts these into per-query outcomes.
    fn lookup(&self, tab: &dyn SessionTab, query: &str) -> Result<Translation, TabPoolError>;
}

/// Production translator that scrapes the translation page DOM.
///
/// Builds the lookup URL by appending the percent-encoded query to the
/// configured page URL, navigates the tab there, waits for the result
/// container and reads the optional sections with a short timeout.
///
/// # Example
///
/// ```rust,ignore
/// use translate_tab_pool::service::DomTranslator;
///
/// let translator = DomTranslator::new("https://translate.google.com/?sl=auto&tl=en")?;
/// let translation = translator.lookup(&*lease, "bonjour")?;
/// assert!(!translation.text.is_empty());
/// ```
pub struct DomTranslator {
    /// The translation page URL; the query is appended as `&text=...`.
    base_url: String,

    /// Selector for the translated text container.
    result_selector: String,

    /// Selector for the romanized pronunciation.
    pronunciation_selector: String,

    /// Selector for the dictionary definitions block, when configured.
    definition_selector: Option<String>,

    /// Selector for the example sentences block, when configured.
    example_selector: Option<String>,

    /// How long to wait for the result container.
    lookup_timeout: Duration,
}

impl DomTranslator {
    /// Create a translator for the given translation page URL.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateServiceError::Internal`] if `base_url` is not a
    /// valid absolute URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TranslateServiceError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| TranslateServiceError::Internal(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            result_selector: DEFAULT_RESULT_SELECTOR.to_string(),
            pronunciation_selector: DEFAULT_PRONUNCIATION_SELECTOR.to_string(),
            definition_selector: None,
            example_selector: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        })
    }

    /// Override the result selector.
    pub fn result_selector(mut self, selector: impl Into<String>) -> Self {
        self.result_selector = selector.into();
        self
    }

    /// Override the pronunciation selector.
    pub fn pronunciation_selector(mut self, selector: impl Into<String>) -> Self {
        self.pronunciation_selector = selector.into();
        self
    }

    /// Scrape dictionary definitions from `selector`, one per line.
    ///
    /// Off by default; the block's markup varies per language pair, so
    /// callers opt in with a selector matching their target page.
    pub fn definition_selector(mut self, selector: impl Into<String>) -> Self {
        self.definition_selector = Some(selector.into());
        self
    }

    /// Scrape example sentences from `selector`, one per line.
    ///
    /// Off by default, like [`definition_selector`](Self::definition_selector).
    pub fn example_selector(mut self, selector: impl Into<String>) -> Self {
        self.example_selector = Some(selector.into());
        self
    }

    /// Override the result wait timeout.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// The full lookup URL for `query`.
    fn lookup_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        if self.base_url.contains('?') {
            format!("{}&text={}", self.base_url, encoded)
        } else {
            format!("{}?text={}", self.base_url, encoded)
        }
    }

    /// Read an optional section, splitting its text into non-blank lines.
    fn optional_lines(&self, tab: &dyn SessionTab, selector: Option<&str>) -> Vec<String> {
        let Some(selector) = selector else {
            return Vec::new();
        };
        tab.query_text(selector, OPTIONAL_SECTION_TIMEOUT)
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl PageTranslator for DomTranslator {
    fn lookup(&self, tab: &dyn SessionTab, query: &str) -> Result<Translation, TabPoolError> {
        tab.navigate(&self.lookup_url(query))?;

        let text = tab.query_text(&self.result_selector, self.lookup_timeout)?;

        // Optional sections: absence is normal, not an error.
        let pronunciation = tab
            .query_text(&self.pronunciation_selector, OPTIONAL_SECTION_TIMEOUT)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let definitions = self.optional_lines(tab, self.definition_selector.as_deref());
        let examples = self.optional_lines(tab, self.example_selector.as_deref());

        Ok(Translation {
            text: text.trim().to_string(),
            pronunciation,
            definitions,
            examples,
        })
    }
}

// ============================================================================
// Public API - Service Functions
// ============================================================================

/// Translate a batch of queries using one leased tab.
///
/// Leases a single tab for the whole batch and runs the queries through
/// it sequentially, in request order. A query that fails to scrape
/// produces a failed [`LookupOutcome`]; its siblings still run. The tab
/// returns to the pool when this function exits, success or not.
///
/// **This function blocks the calling thread.** In async contexts, wrap
/// it in `tokio::task::spawn_blocking`.
///
/// # Errors
///
/// | Error | When |
/// |-------|------|
/// | [`TranslateServiceError::EmptyBatch`] | No non-blank query in the request |
/// | [`TranslateServiceError::PoolExhausted`] | No tab available to lease |
///
/// # Example
///
/// ```rust,ignore
/// let request = TranslateRequest {
///     queries: vec!["hello".to_string(), "thanks".to_string()],
/// };
/// let response = translate_batch(&pool, &translator, &request)?;
/// assert_eq!(response.items.len(), 2);
/// ```
pub fn translate_batch(
    pool: &TabPool,
    translator: &dyn PageTranslator,
    request: &TranslateRequest,
) -> Result<TranslateResponse, TranslateServiceError> {
    if !request.has_queries() {
        return Err(TranslateServiceError::EmptyBatch);
    }

    let tab = pool.acquire().ok_or(TranslateServiceError::PoolExhausted)?;
    log::debug!(
        "Translating batch of {} on tab {}",
        request.queries.len(),
        tab.id()
    );

    let items = request
        .queries
        .iter()
        .map(|query| {
            if query.trim().is_empty() {
                return LookupOutcome::failed(query.clone(), "blank query".to_string());
            }
            match translator.lookup(&*tab, query) {
                Ok(translation) => LookupOutcome::ok(query.clone(), translation),
                Err(e) => {
                    log::warn!("Lookup failed for {:?}: {}", query, e);
                    LookupOutcome::failed(query.clone(), e.to_string())
                }
            }
        })
        .collect();

    Ok(TranslateResponse { items })
}

/// Get current pool statistics.
///
/// Fast and non-blocking; safe to call directly from async handlers.
pub fn pool_stats(pool: &TabPool) -> PoolStatsResponse {
    pool.stats().into()
}

/// Whether the pool can serve a lease right now.
///
/// Useful for readiness probes: a freshly started or fully recycled pool
/// reports `false` until at least one tab is provisioned.
pub fn is_pool_ready(pool: &TabPool) -> bool {
    pool.stats().has_available()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabPoolConfigBuilder;
    use crate::driver::mock::MockSessionDriver;

    /// Scripted translator for exercising the batch loop without a page.
    struct FixedTranslator {
        fail_on: Option<String>,
    }

    impl PageTranslator for FixedTranslator {
        fn lookup(&self, _tab: &dyn SessionTab, query: &str) -> Result<Translation, TabPoolError> {
            if self.fail_on.as_deref() == Some(query) {
                return Err(TabPoolError::Tab("selector not found".to_string()));
            }
            Ok(Translation {
                text: format!("translated {query}"),
                ..Default::default()
            })
        }
    }

    async fn test_pool(target: usize) -> TabPool {
        let pool = TabPool::builder()
            .config(
                TabPoolConfigBuilder::new()
                    .target_size(target)
                    .settle_delay(Duration::ZERO)
                    .build()
                    .unwrap(),
            )
            .driver(Box::new(MockSessionDriver::new()))
            .enable_refresh(false)
            .build()
            .unwrap();
        pool.init().await.unwrap();
        pool
    }

    /// Verifies the happy path keeps query order and returns every item.
    #[tokio::test]
    async fn test_translate_batch_order() {
        let pool = test_pool(1).await;
        let translator = FixedTranslator { fail_on: None };

        let request = TranslateRequest {
            queries: vec!["one".to_string(), "two".to_string()],
        };
        let response = translate_batch(&pool, &translator, &request).unwrap();

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].query, "one");
        assert_eq!(
            response.items[1].translation.as_ref().unwrap().text,
            "translated two"
        );
        pool.shutdown().await.unwrap();
    }

    /// Verifies that one failing query does not take its siblings down.
    #[tokio::test]
    async fn test_translate_batch_per_query_isolation() {
        let pool = test_pool(1).await;
        let translator = FixedTranslator {
            fail_on: Some("bad".to_string()),
        };

        let request = TranslateRequest {
            queries: vec!["good".to_string(), "bad".to_string(), "fine".to_string()],
        };
        let response = translate_batch(&pool, &translator, &request).unwrap();

        assert_eq!(response.succeeded(), 2);
        assert_eq!(response.failed(), 1);
        assert!(response.items[1].error.as_ref().unwrap().contains("selector"));
        pool.shutdown().await.unwrap();
    }

    /// Verifies the empty-batch rejection.
    #[tokio::test]
    async fn test_translate_batch_empty() {
        let pool = test_pool(1).await;
        let translator = FixedTranslator { fail_on: None };

        let result = translate_batch(&pool, &translator, &TranslateRequest::default());
        assert!(matches!(result, Err(TranslateServiceError::EmptyBatch)));

        let blank = TranslateRequest {
            queries: vec!["  ".to_string()],
        };
        let result = translate_batch(&pool, &translator, &blank);
        assert!(matches!(result, Err(TranslateServiceError::EmptyBatch)));
        pool.shutdown().await.unwrap();
    }

    /// Verifies that an exhausted pool maps to the retryable error.
    #[tokio::test]
    async fn test_translate_batch_pool_exhausted() {
        let pool = test_pool(1).await;
        let translator = FixedTranslator { fail_on: None };
        let _held = pool.acquire().unwrap();

        let request = TranslateRequest {
            queries: vec!["hello".to_string()],
        };
        let result = translate_batch(&pool, &translator, &request);

        assert!(matches!(result, Err(TranslateServiceError::PoolExhausted)));
        drop(_held);
        pool.shutdown().await.unwrap();
    }

    /// Verifies the batch releases its tab when done.
    #[tokio::test]
    async fn test_translate_batch_returns_tab() {
        let pool = test_pool(1).await;
        let translator = FixedTranslator { fail_on: None };

        let request = TranslateRequest {
            queries: vec!["hello".to_string()],
        };
        translate_batch(&pool, &translator, &request).unwrap();

        assert_eq!(pool.stats().available, 1);
        pool.shutdown().await.unwrap();
    }

    /// Verifies the DomTranslator URL construction and scrape flow against
    /// the mock tab.
    #[tokio::test]
    async fn test_dom_translator_lookup() {
        let driver = MockSessionDriver::new();
        let pool = TabPool::builder()
            .config(
                TabPoolConfigBuilder::new()
                    .target_size(1)
                    .settle_delay(Duration::ZERO)
                    .build()
                    .unwrap(),
            )
            .driver(Box::new(driver.clone()))
            .enable_refresh(false)
            .build()
            .unwrap();
        pool.init().await.unwrap();

        let translator = DomTranslator::new("https://translate.example.com/?sl=auto&tl=en")
            .unwrap()
            .result_selector(".result");
        let tab = pool.acquire().unwrap();
        let translation = translator.lookup(&*tab, "hello world").unwrap();

        assert_eq!(translation.text, "text of .result");
        assert!(
            driver
                .navigations()
                .iter()
                .any(|url| url.ends_with("&text=hello%20world")),
            "query must be percent-encoded onto the page URL"
        );
        drop(tab);
        pool.shutdown().await.unwrap();
    }

    /// Verifies the definition and example sections are scraped when
    /// selectors are configured and stay empty otherwise.
    #[tokio::test]
    async fn test_dom_translator_optional_sections() {
        let pool = test_pool(1).await;
        let tab = pool.acquire().unwrap();

        let translator = DomTranslator::new("https://translate.example.com/?sl=auto&tl=en")
            .unwrap()
            .result_selector(".result")
            .definition_selector(".definitions")
            .example_selector(".examples");
        let translation = translator.lookup(&*tab, "hello").unwrap();
        assert_eq!(translation.definitions, vec!["text of .definitions"]);
        assert_eq!(translation.examples, vec!["text of .examples"]);

        let bare = DomTranslator::new("https://translate.example.com/?sl=auto&tl=en")
            .unwrap()
            .result_selector(".result");
        let translation = bare.lookup(&*tab, "hello").unwrap();
        assert!(translation.definitions.is_empty());
        assert!(translation.examples.is_empty());

        drop(tab);
        pool.shutdown().await.unwrap();
    }

    /// Verifies that an invalid base URL is rejected up front.
    #[test]
    fn test_dom_translator_invalid_url() {
        let result = DomTranslator::new("not a url");
        assert!(matches!(result, Err(TranslateServiceError::Internal(_))));
    }
}
