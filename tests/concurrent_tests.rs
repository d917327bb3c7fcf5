//! Concurrency tests: many tasks hammering one pool.
//!
//! Uses the mock session driver; the point is the pool's bookkeeping under
//! contention, not the browser.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;

use translate_tab_pool::driver::mock::MockSessionDriver;
use translate_tab_pool::{SharedTabPool, TabPool, TabPoolConfigBuilder};

async fn shared_pool(target: usize) -> SharedTabPool {
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
    pool.into_shared()
}

/// The pool never hands out more leases than it holds tabs, no matter how
/// many tasks are fighting over it.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_acquire_never_overshoots() {
    const TARGET: usize = 3;
    const TASKS: usize = 24;

    let pool = shared_pool(TARGET).await;
    let concurrent = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut tasks = JoinSet::new();
    for _ in 0..TASKS {
        let pool = Arc::clone(&pool);
        let concurrent = Arc::clone(&concurrent);
        let peak = Arc::clone(&peak);
        tasks.spawn(async move {
            for _ in 0..10 {
                if let Some(lease) = pool.acquire() {
                    let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    concurrent.fetch_sub(1, Ordering::SeqCst);
                    drop(lease);
                } else {
                    tokio::task::yield_now().await;
                }
            }
        });
    }
    while tasks.join_next().await.is_some() {}

    assert!(
        peak.load(Ordering::SeqCst) <= TARGET,
        "peak concurrency {} exceeded pool size {}",
        peak.load(Ordering::SeqCst),
        TARGET
    );
    assert_eq!(pool.stats().available, TARGET, "all tabs came home");

    pool.shutdown().await.unwrap();
}

/// No two live leases ever share an id.
///
/// The leases are collected before any id is read, so none is returned
/// to the pool while the others are still being acquired.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_leases_have_distinct_ids() {
    const TARGET: usize = 4;

    let pool = shared_pool(TARGET).await;

    let mut tasks = JoinSet::new();
    for _ in 0..TARGET {
        let pool = Arc::clone(&pool);
        tasks.spawn(async move { pool.acquire() });
    }

    let mut leases = Vec::new();
    while let Some(result) = tasks.join_next().await {
        if let Some(lease) = result.unwrap() {
            leases.push(lease);
        }
    }
    assert_eq!(leases.len(), TARGET, "every task should have gotten a tab");

    let mut ids: Vec<u64> = leases.iter().map(|lease| lease.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), TARGET, "duplicate lease id observed");

    drop(leases);
    pool.shutdown().await.unwrap();
}

/// A refresh racing with active leases leaves the pool consistent: the
/// full target is available afterwards and stale returns are dropped.
#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_races_with_leases() {
    const TARGET: usize = 2;

    let pool = shared_pool(TARGET).await;

    let mut tasks = JoinSet::new();
    for _ in 0..8 {
        let pool = Arc::clone(&pool);
        tasks.spawn(async move {
            for _ in 0..5 {
                if let Some(lease) = pool.acquire() {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    drop(lease);
                }
                tokio::task::yield_now().await;
            }
        });
    }
    let refresher = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            for _ in 0..3 {
                pool.refresh().await;
                tokio::time::sleep(Duration::from_millis(3)).await;
            }
        })
    };

    while tasks.join_next().await.is_some() {}
    refresher.await.unwrap();

    let stats = pool.stats();
    assert_eq!(stats.in_use, 0);
    assert_eq!(stats.available, TARGET);

    pool.shutdown().await.unwrap();
}
