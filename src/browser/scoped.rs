//! Scoped navigation sequences with guaranteed return to the origin.
//!
//! Both helpers restore the browser position on every exit path: success,
//! timeout or fault.

use super::{Browser, BrowserError, TabHandle};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs `f` inside a fresh tab, then closes that tab and refocuses the origin.
///
/// The origin tab keeps its page and scroll position.
pub async fn in_detail_tab<B, F, Fut, T>(browser: &B, f: F) -> Result<T, BrowserError>
where
    B: Browser + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, BrowserError>>,
{
    let origin = browser.current_tab().await?;
    let tab = browser.open_tab().await?;

    if let Err(e) = browser.switch_to(&tab).await {
        discard_tab(browser, &tab, &origin).await;
        return Err(e);
    }
    debug!("Opened detail tab {}", tab);

    let outcome = f().await;

    restore_origin(browser, &origin).await;
    outcome
}

/// Closes a tab that was opened but never focused. A driver can only close
/// the focused tab, so this focuses it first.
async fn discard_tab<B: Browser + ?Sized>(browser: &B, tab: &TabHandle, origin: &TabHandle) {
    match browser.switch_to(tab).await {
        Ok(()) => restore_origin(browser, origin).await,
        Err(e) => {
            warn!("Leaving unfocusable tab {} open: {}", tab, e);
            if let Err(e) = browser.switch_to(origin).await {
                warn!("Failed to return to tab {}: {}", origin, e);
            }
        }
    }
}

async fn restore_origin<B: Browser + ?Sized>(browser: &B, origin: &TabHandle) {
    if let Err(e) = browser.close_tab().await {
        warn!("Failed to close detail tab: {}", e);
    }
    if let Err(e) = browser.switch_to(origin).await {
        warn!("Failed to return to tab {}: {}", origin, e);
    }
}

/// Clicks an action link in the current tab, runs `f` on the page it opens,
/// then navigates back.
///
/// Returns `None` when no link qualifies, and also when the sub-page
/// faults. Faults here only cost the sub-page's data.
pub async fn follow_and_return<B, F, Fut, T>(
    browser: &B,
    selector: &str,
    labels: &[&str],
    timeout: Duration,
    f: F,
) -> Option<T>
where
    B: Browser + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    match browser.click_first(selector, labels).await {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Failed to follow {:?}: {}", labels, e);
            return None;
        }
    }

    let outcome = async {
        browser.wait_for("body", timeout).await?;
        f().await
    }
    .await;

    if let Err(e) = browser.back().await {
        warn!("Failed to navigate back from {:?}: {}", labels, e);
    }

    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!("Sub-page {:?} failed: {}", labels, e);
            None
        }
    }
}
