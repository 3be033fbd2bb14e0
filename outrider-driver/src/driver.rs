use crate::error::Result;
use serde_json::Value;

/// The capability surface the campaign engine consumes from a browser.
///
/// Every method is a suspension point; callers drive exactly one action at a
/// time (see the engine's concurrency model). Implementations exist for a
/// live Chrome session (`ChromeDriver`) and for scripted in-memory fixtures
/// in the engine's test suite.
#[allow(async_fn_in_trait)]
pub trait Driver {
    /// Opaque element handle. Only valid against the page it was located on.
    type Handle;

    /// Navigate the single active page and wait for the document to load.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Block until at least one element matches, or fail with `WaitTimeout`.
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// All elements currently matching, in DOM order. Empty set when none.
    async fn locate(&self, selector: &str) -> Result<Vec<Self::Handle>>;

    /// Poll the element's rendered visibility up to the bound. Any probe
    /// failure degrades to `false` rather than an error.
    async fn is_visible(&self, handle: &Self::Handle, timeout_ms: u64) -> bool;

    async fn is_disabled(&self, handle: &Self::Handle) -> Result<bool>;

    async fn attribute(&self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;

    /// Inner text of the element, empty string when the node has none.
    async fn text(&self, handle: &Self::Handle) -> Result<String>;

    async fn click(&self, handle: &Self::Handle) -> Result<()>;

    /// Clear the element's current value/content and enter `text`.
    async fn fill(&self, handle: &Self::Handle, text: &str) -> Result<()>;

    /// Type into the element without clearing it first.
    async fn type_text(&self, handle: &Self::Handle, text: &str) -> Result<()>;

    /// Dispatch a key press to the page, e.g. "Escape" to dismiss a modal.
    async fn press_key(&self, key: &str) -> Result<()>;

    /// Run a JS function declaration with the element bound to `this`.
    async fn evaluate_in_page(&self, handle: &Self::Handle, js: &str) -> Result<Value>;

    /// Run a JS expression against the page and return its JSON value.
    async fn evaluate(&self, js: &str) -> Result<Value>;

    async fn current_url(&self) -> Result<String>;

    /// Fixed settle pause. Test drivers may make this a no-op.
    async fn sleep(&self, ms: u64);
}
