//! Integration tests for the tab pool lifecycle.
//!
//! All tests run against the mock session driver, so no Chrome binary is
//! needed. Pools are built with the refresh scheduler disabled unless the
//! test is about the scheduler itself.

use std::time::Duration;

use translate_tab_pool::driver::mock::MockSessionDriver;
use translate_tab_pool::{TabPool, TabPoolConfigBuilder, TabPoolError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn quick_config(target: usize) -> translate_tab_pool::TabPoolConfig {
    TabPoolConfigBuilder::new()
        .target_size(target)
        .settle_delay(Duration::ZERO)
        .drain_timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

fn build_pool(target: usize, driver: MockSessionDriver) -> TabPool {
    TabPool::builder()
        .config(quick_config(target))
        .driver(Box::new(driver))
        .enable_refresh(false)
        .build()
        .unwrap()
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_init_provisions_target() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = build_pool(5, driver.clone());

    pool.init().await.unwrap();

    let stats = pool.stats();
    assert_eq!(stats.available, 5);
    assert_eq!(stats.in_use, 0);
    assert!(!stats.is_degraded());
    assert_eq!(driver.open_count(), 1);

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_init_partial_provisioning_is_degraded_not_fatal() {
    init_logging();
    let driver = MockSessionDriver::failing_tabs(2);
    let pool = build_pool(5, driver);

    pool.init().await.unwrap();

    let stats = pool.stats();
    assert_eq!(stats.available, 3, "two slots were lost");
    assert!(stats.is_degraded());

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_init_zero_tabs_still_ok() {
    init_logging();
    let driver = MockSessionDriver::failing_tabs(100);
    let pool = build_pool(2, driver);

    pool.init().await.unwrap();

    assert!(pool.stats().is_empty());
    assert!(pool.acquire().is_none());

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_init_session_open_failure() {
    init_logging();
    let driver = MockSessionDriver::failing_session("chrome exploded");
    let pool = build_pool(2, driver);

    let err = pool.init().await.unwrap_err();

    assert!(matches!(err, TabPoolError::Init(_)));
    assert!(err.to_string().contains("chrome exploded"));
}

#[tokio::test]
async fn test_second_init_is_a_no_op() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = build_pool(2, driver.clone());
    pool.init().await.unwrap();

    let lease = pool.acquire().unwrap();
    pool.init().await.unwrap();
    drop(lease);

    let stats = pool.stats();
    assert_eq!(driver.open_count(), 1, "no second session may be opened");
    assert_eq!(stats.in_use, 0);
    assert_eq!(
        stats.available, 2,
        "a re-init must not stack fresh tabs on top of the pool"
    );

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_init_retries_after_failed_session_open() {
    init_logging();
    let pool = build_pool(2, MockSessionDriver::failing_session("chrome exploded"));

    assert!(pool.init().await.is_err());
    assert!(
        pool.init().await.is_err(),
        "a failed init must not latch the pool as initialized"
    );
}

#[tokio::test]
async fn test_consent_click_failure_does_not_lose_slots() {
    init_logging();
    let driver = MockSessionDriver::failing_clicks();
    let pool = build_pool(3, driver);

    pool.init().await.unwrap();

    assert_eq!(pool.stats().available, 3);

    pool.shutdown().await.unwrap();
}

// ============================================================================
// Leasing
// ============================================================================

#[tokio::test]
async fn test_acquire_until_exhausted() {
    init_logging();
    let pool = build_pool(3, MockSessionDriver::new());
    pool.init().await.unwrap();

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    let c = pool.acquire().unwrap();

    assert!(pool.acquire().is_none(), "pool must not overshoot its size");
    assert_eq!(pool.stats().in_use, 3);

    drop((a, b, c));
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lease_ids_are_unique() {
    init_logging();
    let pool = build_pool(4, MockSessionDriver::new());
    pool.init().await.unwrap();

    let leases: Vec<_> = (0..4).map(|_| pool.acquire().unwrap()).collect();
    let mut ids: Vec<u64> = leases.iter().map(|l| l.id()).collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 4);

    drop(leases);
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_drop_returns_tab_lifo() {
    init_logging();
    let pool = build_pool(2, MockSessionDriver::new());
    pool.init().await.unwrap();

    let a = pool.acquire().unwrap();
    let a_id = a.id();
    let _b = pool.acquire().unwrap();
    assert!(pool.acquire().is_none());

    drop(a);
    let c = pool.acquire().unwrap();
    assert_eq!(c.id(), a_id, "the most recently returned tab goes out first");

    drop((c, _b));
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lease_survives_pool_handle_drop() {
    init_logging();
    let pool = build_pool(1, MockSessionDriver::new());
    pool.init().await.unwrap();
    let shared = pool.into_shared();

    let lease = shared.acquire().unwrap();
    // The lease holds its own Arc into the pool internals, so returning
    // after the last explicit use of the pool handle is safe.
    drop(lease);

    assert_eq!(shared.stats().available, 1);
    shared.shutdown().await.unwrap();
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_reprovisions_full_target() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = build_pool(3, driver.clone());
    pool.init().await.unwrap();

    let old_ids: Vec<u64> = {
        let leases: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();
        leases.iter().map(|l| l.id()).collect()
    };

    pool.refresh().await;

    let stats = pool.stats();
    assert_eq!(stats.available, 3, "refresh rebuilds the full pool");
    assert_eq!(driver.open_count(), 2);
    assert_eq!(driver.close_count(), 1);

    let new_lease = pool.acquire().unwrap();
    assert!(
        !old_ids.contains(&new_lease.id()),
        "tabs from the old session never come back"
    );

    drop(new_lease);
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stale_return_after_refresh_is_discarded() {
    init_logging();
    let pool = build_pool(2, MockSessionDriver::new());
    pool.init().await.unwrap();

    let lease = pool.acquire().unwrap();
    pool.refresh().await;

    assert_eq!(pool.stats().available, 2);
    drop(lease);
    assert_eq!(
        pool.stats().available,
        2,
        "a stale lease must not be re-pooled"
    );
    assert_eq!(pool.stats().in_use, 0);

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_scheduler_recycles_periodically() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = TabPool::builder()
        .config(
            TabPoolConfigBuilder::new()
                .target_size(1)
                .settle_delay(Duration::ZERO)
                .refresh_interval(Duration::from_millis(40))
                .build()
                .unwrap(),
        )
        .driver(Box::new(driver.clone()))
        .build()
        .unwrap();

    pool.init().await.unwrap();
    tokio::time::sleep(Duration::from_millis(140)).await;

    assert!(
        driver.open_count() >= 2,
        "the scheduler should have recycled at least once"
    );
    assert!(driver.close_count() >= 1);

    pool.shutdown().await.unwrap();

    let settled = driver.open_count();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        driver.open_count(),
        settled,
        "no recycle may fire after shutdown"
    );
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_shutdown_refuses_new_leases() {
    init_logging();
    let pool = build_pool(2, MockSessionDriver::new());
    pool.init().await.unwrap();

    pool.shutdown().await.unwrap();

    assert!(pool.acquire().is_none());
    assert!(pool.stats().is_empty());
}

#[tokio::test]
async fn test_shutdown_waits_for_outstanding_lease() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = build_pool(1, driver.clone());
    pool.init().await.unwrap();
    let shared = pool.into_shared();

    let lease = shared.acquire().unwrap();
    let holder = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(lease);
    });

    shared.shutdown().await.unwrap();
    holder.await.unwrap();

    assert_eq!(driver.close_count(), 1);
    assert!(shared.stats().is_empty());
}

#[tokio::test]
async fn test_shutdown_unblocks_on_release_not_drain_timeout() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = TabPool::builder()
        .config(
            TabPoolConfigBuilder::new()
                .target_size(1)
                .settle_delay(Duration::ZERO)
                .drain_timeout(Duration::from_secs(30))
                .build()
                .unwrap(),
        )
        .driver(Box::new(driver))
        .enable_refresh(false)
        .build()
        .unwrap();
    pool.init().await.unwrap();
    let shared = pool.into_shared();

    let lease = shared.acquire().unwrap();
    let holder = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(lease);
    });

    let started = std::time::Instant::now();
    shared.shutdown().await.unwrap();
    holder.await.unwrap();

    assert!(
        started.elapsed() < Duration::from_secs(5),
        "shutdown must wake on the release, not sit out the drain timeout"
    );
}

#[tokio::test]
async fn test_shutdown_drain_timeout_proceeds() {
    init_logging();
    let driver = MockSessionDriver::new();
    let pool = TabPool::builder()
        .config(
            TabPoolConfigBuilder::new()
                .target_size(1)
                .settle_delay(Duration::ZERO)
                .drain_timeout(Duration::from_millis(50))
                .build()
                .unwrap(),
        )
        .driver(Box::new(driver.clone()))
        .enable_refresh(false)
        .build()
        .unwrap();
    pool.init().await.unwrap();

    let lease = pool.acquire().unwrap();
    pool.shutdown().await.unwrap();

    assert_eq!(driver.close_count(), 1, "teardown proceeds past the drain");

    // Dropping the straggler afterwards is a silent no-op.
    drop(lease);
    assert!(pool.stats().is_empty());
}

#[tokio::test]
async fn test_shutdown_twice_is_harmless() {
    init_logging();
    let pool = build_pool(1, MockSessionDriver::new());
    pool.init().await.unwrap();

    pool.shutdown().await.unwrap();
    pool.shutdown().await.unwrap();
}
