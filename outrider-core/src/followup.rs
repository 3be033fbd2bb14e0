use crate::error::Result;
use crate::options::FollowupOptions;
use crate::selectors::{self, js};
use outrider_driver::{Driver, DriverError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const INBOX_RENDER_MS: u64 = 20_000;
const EDITOR_RENDER_MS: u64 = 15_000;
const PASS_SETTLE_MS: u64 = 1_200;

/// A conversation whose latest snippet matched the target phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationMatch {
    /// DOM id of the list item, or a name+snippet pair when it has none.
    pub id: String,
    pub name: String,
}

/// Lazily discovers matching conversations, one pass per pull.
///
/// Each `next_matches` call evaluates the visible conversation list,
/// yields conversations not seen before, then tries to reveal more via the
/// "load more" control or by scrolling. The sequence ends after the
/// configured pass budget, or after two consecutive idle passes once the
/// list stops moving.
pub struct ConversationScanner<'a, D: Driver> {
    driver: &'a D,
    discover_js: String,
    seen: HashSet<String>,
    pass: u32,
    idle_passes: u32,
    max_passes: u32,
    done: bool,
}

impl<'a, D: Driver> ConversationScanner<'a, D> {
    pub fn new(driver: &'a D, target_snippet: &str, max_passes: u32) -> Self {
        Self {
            driver,
            discover_js: js::discover_conversations(&target_snippet.trim().to_lowercase()),
            seen: HashSet::new(),
            pass: 0,
            idle_passes: 0,
            max_passes,
            done: false,
        }
    }

    /// One discovery pass. `None` once the sequence is exhausted.
    pub async fn next_matches(&mut self) -> Result<Option<Vec<ConversationMatch>>> {
        if self.done || self.pass >= self.max_passes {
            return Ok(None);
        }
        self.pass += 1;

        let visible = self.driver.evaluate(&self.discover_js).await?;
        let mut fresh = Vec::new();
        if let Some(items) = visible.as_array() {
            for item in items {
                let (Some(id), Some(name)) = (
                    item.get("id").and_then(|v| v.as_str()),
                    item.get("name").and_then(|v| v.as_str()),
                ) else {
                    continue;
                };
                if self.seen.insert(id.to_string()) {
                    fresh.push(ConversationMatch {
                        id: id.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }

        if fresh.is_empty() {
            self.idle_passes += 1;
        } else {
            self.idle_passes = 0;
        }

        let loaded_more = self.eval_bool(js::CLICK_LOAD_MORE).await;
        let scrolled = self.eval_bool(js::SCROLL_CONVERSATION_LIST).await;
        if !loaded_more && !scrolled {
            if self.idle_passes >= 2 {
                debug!("conversation list exhausted after {} passes", self.pass);
                self.done = true;
            }
        } else {
            self.driver.sleep(PASS_SETTLE_MS).await;
        }

        Ok(Some(fresh))
    }

    async fn eval_bool(&self, script: &str) -> bool {
        self.driver
            .evaluate(script)
            .await
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// Scan the inbox for conversations opened by the campaign note and send
/// each a second-touch message, bounded by `max_send`. Returns how many
/// messages were sent.
pub async fn run_followup<D: Driver>(driver: &D, opts: &FollowupOptions) -> Result<u32> {
    open_inbox(driver, &opts.origin).await?;

    let mut scanner = ConversationScanner::new(driver, &opts.target_snippet, opts.max_scroll_passes);
    let mut sent = 0u32;

    'scan: while let Some(matches) = scanner.next_matches().await? {
        for conversation in matches {
            info!(
                "found a conversation with {}, drafting reply...",
                conversation.name
            );
            let message = format_followup(&opts.template, &conversation.name);
            if let Err(e) = send_followup(driver, &conversation, &message, opts.cooldown_ms).await {
                warn!("could not send follow-up to {}: {}", conversation.name, e);
                continue;
            }
            sent += 1;
            if sent >= opts.max_send {
                info!("reached max send count of {}, stopping", opts.max_send);
                break 'scan;
            }
        }
    }

    if sent == 0 {
        info!("no conversations matched the target phrase");
    }
    Ok(sent)
}

async fn open_inbox<D: Driver>(driver: &D, origin: &str) -> Result<()> {
    info!("opening messaging inbox...");
    driver
        .navigate(&format!("{}/messaging/", origin.trim_end_matches('/')))
        .await?;
    driver
        .wait_for_selector(selectors::CONVERSATION_ITEM, INBOX_RENDER_MS)
        .await?;
    driver.sleep(1_000).await;
    Ok(())
}

async fn send_followup<D: Driver>(
    driver: &D,
    conversation: &ConversationMatch,
    message: &str,
    cooldown_ms: u64,
) -> std::result::Result<(), DriverError> {
    let link_selector = format!(
        "li#{} .msg-conversation-listitem__link",
        css_escape(&conversation.id)
    );
    let links = driver.locate(&link_selector).await?;
    let Some(link) = links.first() else {
        return Err(DriverError::NotFound(link_selector));
    };
    driver.click(link).await?;

    driver
        .wait_for_selector(selectors::CONVERSATION_EDITOR, EDITOR_RENDER_MS)
        .await?;
    let editor = driver
        .locate(selectors::CONVERSATION_EDITOR)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| DriverError::NotFound(selectors::CONVERSATION_EDITOR.to_string()))?;
    driver.click(&editor).await?;
    driver.fill(&editor, "").await?;
    driver.type_text(&editor, message).await?;
    debug!("drafted follow-up for {}", conversation.name);

    if let Ok(buttons) = driver.locate(selectors::CONVERSATION_SEND_BUTTON).await
        && let Some(send) = buttons.first()
        && driver.is_visible(send, 1_000).await
    {
        let _ = driver.click(send).await;
    }
    driver.sleep(cooldown_ms).await;
    Ok(())
}

/// Substitute the addressee's first name into the template, falling back
/// to "there" when nothing letter-like survives.
pub fn format_followup(template: &str, full_name: &str) -> String {
    let first = extract_first_name(full_name);
    let first = if first.is_empty() { "there" } else { &first };
    template.replace("{first_name}", first)
}

/// First whitespace/comma-delimited token, stripped of everything but
/// letters, apostrophes and hyphens.
pub fn extract_first_name(full_name: &str) -> String {
    full_name
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| !token.is_empty())
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_alphabetic() || *c == '\'' || *c == '-')
                .collect()
        })
        .unwrap_or_default()
}

/// Escape a raw DOM id for use inside a CSS selector.
fn css_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}
