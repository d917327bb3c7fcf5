//! Axum framework integration.
//!
//! This module provides a ready-made router exposing the translation
//! service over HTTP, plus the [`AppState`] it runs on.
//!
//! # Routes
//!
//! | Method | Path | Handler | Purpose |
//! |--------|------|---------|---------|
//! | `POST` | `/translate` | [`translate`] | Translate a batch of queries |
//! | `GET` | `/pool/stats` | [`stats`] | Tab pool statistics |
//! | `GET` | `/health` | [`health`] | Liveness check |
//!
//! # Setup
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! translate-tab-pool = { version = "0.1", features = ["axum-integration"] }
//! axum = "0.8"
//! ```
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use translate_tab_pool::init_tab_pool;
//! use translate_tab_pool::integrations::axum::{AppState, router};
//! use translate_tab_pool::service::DomTranslator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = init_tab_pool().await?;
//!     let translator = DomTranslator::new("https://translate.google.com/?sl=auto&tl=en")?;
//!
//!     let app = router(AppState::new(pool, Arc::new(translator)));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Graceful Shutdown
//!
//! For proper tab drain on SIGTERM, shut the pool down after the server
//! stops accepting connections:
//!
//! ```rust,ignore
//! axum::serve(listener, app)
//!     .with_graceful_shutdown(shutdown_signal())
//!     .await?;
//! pool.shutdown().await?;
//! ```

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use crate::SharedTabPool;
use crate::service::{
    ErrorResponse, HealthResponse, PageTranslator, PoolStatsResponse, TranslateRequest,
    TranslateResponse, TranslateServiceError, is_pool_ready, pool_stats, translate_batch,
};

/// Shared state for the translation routes.
///
/// Cheap to clone; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// The tab pool serving leases.
    pub pool: SharedTabPool,

    /// The translator driving leased tabs.
    pub translator: Arc<dyn PageTranslator>,
}

impl AppState {
    /// Bundle a pool and a translator into router state.
    pub fn new(pool: SharedTabPool, translator: Arc<dyn PageTranslator>) -> Self {
        Self { pool, translator }
    }
}

/// Build the translation service router.
///
/// Mount it as-is or [`Router::nest`] it under a prefix.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/pool/stats", get(stats))
        .route("/health", get(health))
        .with_state(state)
}

/// `POST /translate` - translate a batch of queries.
///
/// The batch runs on one leased tab inside `spawn_blocking`; the handler
/// itself never blocks the runtime.
pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, Response> {
    let pool = Arc::clone(&state.pool);
    let translator = Arc::clone(&state.translator);

    let result = tokio::task::spawn_blocking(move || {
        translate_batch(&pool, translator.as_ref(), &request)
    })
    .await;

    match result {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            log::error!("Translate task failed: {}", e);
            Err(error_response(&TranslateServiceError::Internal(
                "translation task failed".to_string(),
            )))
        }
    }
}

/// `GET /pool/stats` - current tab pool occupancy.
pub async fn stats(State(state): State<AppState>) -> Json<PoolStatsResponse> {
    Json(pool_stats(&state.pool))
}

/// `GET /health` - liveness check.
///
/// Returns `200` while the process is up. Readiness (at least one tab
/// provisioned) is reported in the body so probes can distinguish a
/// degraded pool from a dead process.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut response = HealthResponse::default();
    if !is_pool_ready(&state.pool) {
        response.status = "degraded".to_string();
    }
    (StatusCode::OK, Json(response))
}

/// Map a service error to its JSON error response.
fn error_response(err: &TranslateServiceError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TabPool;
    use crate::config::TabPoolConfigBuilder;
    use crate::driver::mock::MockSessionDriver;
    use crate::error::TabPoolError;
    use crate::service::Translation;
    use std::time::Duration;

    struct EchoTranslator;

    impl PageTranslator for EchoTranslator {
        fn lookup(
            &self,
            _tab: &dyn crate::driver::SessionTab,
            query: &str,
        ) -> Result<Translation, TabPoolError> {
            Ok(Translation {
                text: query.to_uppercase(),
                ..Default::default()
            })
        }
    }

    async fn test_state(target: usize) -> AppState {
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
        AppState::new(pool.into_shared(), Arc::new(EchoTranslator))
    }

    /// Verifies the translate handler round-trips a batch.
    #[tokio::test]
    async fn test_translate_handler() {
        let state = test_state(1).await;

        let request = TranslateRequest {
            queries: vec!["hello".to_string()],
        };
        let Json(response) = translate(State(state), Json(request)).await.unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].translation.as_ref().unwrap().text, "HELLO");
    }

    /// Verifies the empty-batch error surfaces as a rejection.
    #[tokio::test]
    async fn test_translate_handler_empty_batch() {
        let state = test_state(1).await;

        let result = translate(State(state), Json(TranslateRequest::default())).await;
        let response = result.unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Verifies the stats handler reports pool occupancy.
    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state(2).await;

        let Json(response) = stats(State(state)).await;

        assert_eq!(response.available, 2);
        assert_eq!(response.target, 2);
    }

    /// Verifies the health handler flags an empty pool as degraded.
    #[tokio::test]
    async fn test_health_handler() {
        let state = test_state(1).await;
        let (status, Json(body)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "healthy");

        let _lease = state.pool.acquire().unwrap();
        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "degraded");
    }

    /// Verifies the router builds with all routes registered.
    #[tokio::test]
    async fn test_router_builds() {
        let state = test_state(1).await;
        let _app: Router = router(state);
    }
}
