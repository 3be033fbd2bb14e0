use crate::driver::Driver;
use crate::error::{DriverError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often polling waits re-probe the page.
const POLL_INTERVAL_MS: u64 = 250;

const VISIBILITY_PROBE: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const s = window.getComputedStyle(this); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; \
}";

const DISABLED_PROBE: &str = "function() { return this.disabled === true; }";

const CLEAR_VALUE: &str = "function() { \
    if ('value' in this) { this.value = ''; } \
    if (this.isContentEditable) { this.textContent = ''; } \
    this.dispatchEvent(new Event('input', { bubbles: true })); \
}";

#[derive(Debug, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Chrome profile directory. Cookies and local storage persist here, so
    /// a logged-in session survives across runs.
    pub profile_dir: Option<PathBuf>,
}

/// `Driver` backed by a single page of a locally launched Chrome instance.
pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl ChromeDriver {
    pub async fn launch(opts: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(ref dir) = opts.profile_dir {
            builder = builder.user_data_dir(dir);
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The CDP event loop has to be polled for the connection to stay alive.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Close the page and the browser process. Preferred over dropping,
    /// which leaves the Chrome process to be reaped by the OS.
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }

    async fn probe_js_bool(&self, element: &Element, function: &str) -> Result<bool> {
        let returns = element
            .call_js_fn(function, false)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

impl Driver for ChromeDriver {
    type Handle = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        // Navigation events can still be in flight after goto resolves.
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if let Ok(elements) = self.page.find_elements(selector).await
                && !elements.is_empty()
            {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms,
                });
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn locate(&self, selector: &str) -> Result<Vec<Element>> {
        // A selector with zero matches is an empty set, not an error.
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(elements),
            Err(e) => {
                debug!("locate '{}' found nothing: {}", selector, e);
                Ok(Vec::new())
            }
        }
    }

    async fn is_visible(&self, handle: &Element, timeout_ms: u64) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.probe_js_bool(handle, VISIBILITY_PROBE).await.unwrap_or(false) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    async fn is_disabled(&self, handle: &Element) -> Result<bool> {
        self.probe_js_bool(handle, DISABLED_PROBE).await
    }

    async fn attribute(&self, handle: &Element, name: &str) -> Result<Option<String>> {
        handle
            .attribute(name)
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))
    }

    async fn text(&self, handle: &Element) -> Result<String> {
        let text = handle
            .inner_text()
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn click(&self, handle: &Element) -> Result<()> {
        let _ = handle.scroll_into_view().await;
        handle
            .click()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Browser(e.to_string()))
    }

    async fn fill(&self, handle: &Element, text: &str) -> Result<()> {
        self.click(handle).await?;
        handle
            .call_js_fn(CLEAR_VALUE, false)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        if !text.is_empty() {
            handle
                .type_str(text)
                .await
                .map(|_| ())
                .map_err(|e| DriverError::Browser(e.to_string()))?;
        }
        Ok(())
    }

    async fn type_text(&self, handle: &Element, text: &str) -> Result<()> {
        handle
            .type_str(text)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Browser(e.to_string()))
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let body = self
            .page
            .find_element("body")
            .await
            .map_err(|e| DriverError::NotFound(format!("body: {}", e)))?;
        body.press_key(key)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Browser(e.to_string()))
    }

    async fn evaluate_in_page(&self, handle: &Element, js: &str) -> Result<Value> {
        let returns = handle
            .call_js_fn(js, false)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        Ok(returns.result.value.unwrap_or(Value::Null))
    }

    async fn evaluate(&self, js: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| DriverError::Evaluation(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn current_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn sleep(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
