use crate::error::SessionError;
use crate::options::SessionOptions;
use crate::selectors;
use outrider_driver::Driver;
use std::time::{Duration, Instant};
use tracing::info;

const SESSION_PROBE_MS: u64 = 8_000;
const LOGIN_REDIRECT_MS: u64 = 60_000;

/// A session is valid when the authenticated feed exposes the global
/// search input. Probe failures degrade to "not valid", never an error.
pub async fn has_valid_session<D: Driver>(driver: &D, origin: &str) -> bool {
    if driver
        .navigate(&format!("{}/feed/", origin.trim_end_matches('/')))
        .await
        .is_err()
    {
        return false;
    }
    match driver.locate(selectors::SEARCH_INPUT).await {
        Ok(handles) => match handles.first() {
            Some(input) => driver.is_visible(input, SESSION_PROBE_MS).await,
            None => false,
        },
        Err(_) => false,
    }
}

/// Reuse the stored session when it still works, otherwise log in with
/// credentials. Session cookies persist through the browser profile, so a
/// successful credential login repairs future runs too.
pub async fn ensure_session<D: Driver>(
    driver: &D,
    opts: &SessionOptions,
) -> Result<(), SessionError> {
    info!("checking stored session...");
    if has_valid_session(driver, &opts.origin).await {
        info!("reusing saved session");
        return Ok(());
    }

    info!("stored session unavailable, logging in with credentials...");
    let (Some(email), Some(password)) = (&opts.email, &opts.password) else {
        return Err(SessionError::MissingCredentials(
            "OUTRIDER_EMAIL and OUTRIDER_PASSWORD".to_string(),
        ));
    };

    let origin = opts.origin.trim_end_matches('/');
    driver.navigate(&format!("{origin}/login")).await?;

    fill_first(driver, selectors::LOGIN_USERNAME, email).await?;
    fill_first(driver, selectors::LOGIN_PASSWORD, password).await?;
    click_first(driver, selectors::LOGIN_SUBMIT).await?;

    wait_for_feed(driver, LOGIN_REDIRECT_MS).await?;
    info!("logged in successfully");
    Ok(())
}

/// Poll until the post-login redirect lands on the feed.
pub async fn wait_for_feed<D: Driver>(driver: &D, timeout_ms: u64) -> Result<(), SessionError> {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if let Ok(url) = driver.current_url().await
            && url.contains("/feed")
        {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(SessionError::LoginFailed(format!(
                "feed page not reached within {}ms",
                timeout_ms
            )));
        }
        driver.sleep(500).await;
    }
}

async fn fill_first<D: Driver>(driver: &D, selector: &str, text: &str) -> Result<(), SessionError> {
    let handles = driver.locate(selector).await?;
    let Some(handle) = handles.first() else {
        return Err(SessionError::LoginFailed(format!(
            "login control '{}' not found",
            selector
        )));
    };
    driver.fill(handle, text).await?;
    Ok(())
}

async fn click_first<D: Driver>(driver: &D, selector: &str) -> Result<(), SessionError> {
    let handles = driver.locate(selector).await?;
    let Some(handle) = handles.first() else {
        return Err(SessionError::LoginFailed(format!(
            "login control '{}' not found",
            selector
        )));
    };
    driver.click(handle).await?;
    Ok(())
}
