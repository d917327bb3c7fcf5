//! Per-tab provisioning pipeline.
//!
//! A pooled tab is not just an open tab: it has the cache disabled, a
//! request filter installed, the translation page loaded, and (where one
//! appears) the consent dialog dismissed. This module runs that sequence
//! for a single tab slot and reports failures as structured
//! [`ProvisionFailure`] values so initialization and refresh can log them
//! and keep going with the slots that succeeded.
//!
//! # Steps
//!
//! 1. Create the tab
//! 2. Disable the browser cache
//! 3. Install the request filter
//! 4. Navigate to the translation page and let it settle
//! 5. Attempt consent dismissal (non-fatal)
//!
//! Steps 1 through 4 lose the slot on failure; step 5 only warns. A tab
//! whose consent dialog was not dismissed still works in most regions,
//! and failing the slot for it would shrink the pool for nothing.

use std::sync::Arc;
use std::thread;

use crate::config::TabPoolConfig;
use crate::driver::BrowserSession;
use crate::error::{ProvisionFailure, ProvisionStep};
use crate::tab::PooledTab;

/// Provision one tab slot in `session`.
///
/// Blocking; the pool runs this under `spawn_blocking`, one task per slot.
///
/// # Parameters
///
/// * `session` - The live browser session to open the tab in.
/// * `index` - Zero-based slot index, reported in failures and logs.
/// * `generation` - Recycle cycle stamp for the resulting tab.
/// * `config` - Page URL, filter, selectors and timing.
///
/// # Errors
///
/// Returns [`ProvisionFailure`] naming the step that failed. The slot is
/// simply lost; nothing needs to be rolled back because the tab dies with
/// the session.
pub(crate) fn provision_tab(
    session: &dyn BrowserSession,
    index: usize,
    generation: u64,
    config: &TabPoolConfig,
) -> std::result::Result<PooledTab, ProvisionFailure> {
    let fail = |step: ProvisionStep, cause: String| ProvisionFailure { index, step, cause };

    log::debug!("Provisioning tab slot {} (generation {})", index, generation);

    // Step 1: open the tab
    let tab: Arc<dyn crate::driver::SessionTab> = session
        .new_tab()
        .map_err(|e| fail(ProvisionStep::CreateTab, e.to_string()))?;

    // Step 2: every lookup must observe the live page
    tab.set_cache_enabled(false)
        .map_err(|e| fail(ProvisionStep::DisableCache, e.to_string()))?;

    // Step 3: abort heavy resources before they hit the network
    tab.intercept_requests(config.blocked_resources.clone())
        .map_err(|e| fail(ProvisionStep::RequestFilter, e.to_string()))?;

    // Step 4: park the tab on the translation page
    tab.navigate(&config.page_url)
        .map_err(|e| fail(ProvisionStep::Navigate, e.to_string()))?;
    if !config.settle_delay.is_zero() {
        thread::sleep(config.settle_delay);
    }

    // Step 5: consent dismissal, warn-only
    match tab.click(&config.consent_selector, config.consent_timeout) {
        Ok(()) => {
            log::debug!("Tab slot {}: consent dialog dismissed", index);
        }
        Err(e) => {
            log::warn!(
                "Tab slot {}: consent dialog not handled ({}); continuing anyway",
                index,
                e
            );
        }
    }

    let pooled = PooledTab::new(tab, generation);
    log::debug!("Tab slot {} ready as tab {}", index, pooled.id());
    Ok(pooled)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TabPoolConfigBuilder;
    use crate::driver::SessionDriver;
    use crate::driver::mock::MockSessionDriver;
    use std::time::Duration;

    fn quick_config() -> TabPoolConfig {
        TabPoolConfigBuilder::new()
            .settle_delay(Duration::ZERO)
            .build()
            .unwrap()
    }

    /// Verifies the happy path: a provisioned tab navigated to the page URL
    /// and stamped with the requested generation.
    #[test]
    fn test_provision_success() {
        let driver = MockSessionDriver::new();
        let session = driver.open().unwrap();
        let config = quick_config();

        let tab = provision_tab(session.as_ref(), 0, 4, &config).unwrap();

        assert_eq!(tab.generation(), 4);
        assert_eq!(driver.navigations(), vec![config.page_url.clone()]);
    }

    /// Verifies that a tab-creation failure is reported at the create-tab
    /// step with the slot index.
    #[test]
    fn test_provision_create_tab_failure() {
        let driver = MockSessionDriver::failing_tabs(1);
        let session = driver.open().unwrap();
        let config = quick_config();

        let err = provision_tab(session.as_ref(), 3, 0, &config).unwrap_err();

        assert_eq!(err.index, 3);
        assert_eq!(err.step, ProvisionStep::CreateTab);
    }

    /// Verifies that a failed consent click does not fail provisioning.
    #[test]
    fn test_provision_consent_failure_is_non_fatal() {
        let driver = MockSessionDriver::failing_clicks();
        let session = driver.open().unwrap();
        let config = quick_config();

        let result = provision_tab(session.as_ref(), 0, 0, &config);
        assert!(result.is_ok(), "consent failure must not lose the slot");
    }
}
