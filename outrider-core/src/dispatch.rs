use crate::classify::classify;
use crate::dedup::DedupIndex;
use crate::options::ActionTimeouts;
use crate::record::{canonical_profile_url, Outreach, ProfileRecord, Relationship};
use crate::selectors::{self, js};
use outrider_driver::{Driver, DriverError};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// How one connect-with-note attempt ended.
enum Attempt {
    Sent,
    /// Control text was actionable but nothing inside it was clickable;
    /// treated like a plain discovery.
    ControlUnclickable,
    FailedBeforeMessage(DriverError),
    FailedAfterMessage(DriverError),
}

/// Per-profile state machine: classify each visible search result, send a
/// connection request with the fixed note where eligible, and sort every
/// profile into exactly one sink.
pub struct Dispatcher<'a, D: Driver> {
    driver: &'a D,
    origin: &'a str,
    note: &'a str,
    timeouts: &'a ActionTimeouts,
}

impl<'a, D: Driver> Dispatcher<'a, D> {
    pub fn new(
        driver: &'a D,
        origin: &'a str,
        note: &'a str,
        timeouts: &'a ActionTimeouts,
    ) -> Self {
        Self {
            driver,
            origin,
            note,
            timeouts,
        }
    }

    /// Scan the currently loaded page in DOM order, processing at most
    /// `max` profiles that are new to this run and to the historical index.
    ///
    /// Returns the records destined for the main results log. Profiles
    /// whose note was written before the send broke go to `failed` instead,
    /// and follow-only profiles go nowhere at all.
    pub async fn scan_page(
        &self,
        max: usize,
        seen: &mut HashSet<String>,
        index: &DedupIndex,
        failed: &mut Vec<ProfileRecord>,
    ) -> Result<Vec<ProfileRecord>, DriverError> {
        let mut page_results = Vec::new();
        let mut processed = 0usize;

        let links = self.driver.locate(selectors::RESULT_TITLE_LINK).await?;
        for link in &links {
            if processed >= max {
                break;
            }

            // Per-item failures skip the item, never the page.
            let name = match self.driver.text(link).await {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    debug!("skipping unreadable result entry: {}", e);
                    continue;
                }
            };
            if name.is_empty() {
                continue;
            }
            let href = match self.driver.attribute(link, "href").await {
                Ok(Some(href)) if !href.is_empty() => href,
                _ => continue,
            };
            let profile_url = canonical_profile_url(self.origin, &href);

            if seen.contains(&profile_url) || index.contains(&profile_url) {
                continue;
            }

            let control_text = self
                .driver
                .evaluate_in_page(link, js::RELATIONSHIP_TEXT)
                .await
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let relationship = classify(&control_text);
            let mut record = ProfileRecord::new(name, profile_url.clone(), relationship);

            match relationship {
                Relationship::Following => {
                    // Never written to any log, but marked seen so the
                    // entry is not reprocessed later in the run.
                    debug!("skipping follow-only profile {}", record.name);
                    record.outcome = Outreach::SkippedFollowing;
                    seen.insert(profile_url);
                    processed += 1;
                    continue;
                }
                Relationship::Pending => {
                    debug!("skipping pending profile {}", record.name);
                    record.outcome = Outreach::SkippedPending;
                }
                Relationship::AlreadyConnectedOrUnknown => {
                    // No actionable control; record the discovery as-is.
                }
                Relationship::Unconnected => match self.attempt_outreach(link).await {
                    Attempt::Sent => {
                        info!("invitation sent to {}", record.name);
                        record.outcome = Outreach::Sent;
                    }
                    Attempt::ControlUnclickable => {
                        warn!(
                            "relationship control for {} had nothing clickable, \
                             recording without action",
                            record.name
                        );
                    }
                    Attempt::FailedBeforeMessage(e) => {
                        warn!("note flow broke before writing for {}: {}", record.name, e);
                        record.outcome = Outreach::FailedBeforeAction;
                    }
                    Attempt::FailedAfterMessage(e) => {
                        warn!(
                            "send failed after note was written for {}: {}",
                            record.name, e
                        );
                        record.outcome = Outreach::FailedAfterMessageWritten;
                        failed.push(record);
                        seen.insert(profile_url);
                        processed += 1;
                        continue;
                    }
                },
            }

            page_results.push(record);
            seen.insert(profile_url);
            processed += 1;
        }

        Ok(page_results)
    }

    /// Open the relationship control and run the note sequence. The invite
    /// overlay is always dismissed afterwards, on success or failure, so a
    /// stuck modal can never block page navigation.
    async fn attempt_outreach(&self, link: &D::Handle) -> Attempt {
        let clicked = self
            .driver
            .evaluate_in_page(link, js::RELATIONSHIP_CLICK)
            .await
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !clicked {
            return Attempt::ControlUnclickable;
        }

        let mut message_written = false;
        let outcome = match self.run_note_sequence(&mut message_written).await {
            Ok(()) => Attempt::Sent,
            Err(e) if message_written => Attempt::FailedAfterMessage(e),
            Err(e) => Attempt::FailedBeforeMessage(e),
        };

        dismiss_overlay(self.driver).await;
        outcome
    }

    async fn run_note_sequence(&self, message_written: &mut bool) -> Result<(), DriverError> {
        let bound = self.timeouts.affordance_ms;

        self.driver
            .wait_for_selector(selectors::ADD_NOTE_BUTTON, bound)
            .await?;
        self.click_first(selectors::ADD_NOTE_BUTTON).await?;

        self.driver
            .wait_for_selector(selectors::NOTE_INPUT, bound)
            .await?;
        let input = self.first(selectors::NOTE_INPUT).await?;
        self.driver.fill(&input, self.note).await?;
        *message_written = true;

        self.driver
            .wait_for_selector(selectors::SEND_INVITATION_BUTTON, bound)
            .await?;
        self.click_first(selectors::SEND_INVITATION_BUTTON).await?;

        // Let the site settle before the next profile's sequence begins.
        self.driver.sleep(self.timeouts.cooldown_ms).await;
        Ok(())
    }

    async fn first(&self, selector: &str) -> Result<D::Handle, DriverError> {
        self.driver
            .locate(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(selector.to_string()))
    }

    async fn click_first(&self, selector: &str) -> Result<(), DriverError> {
        let handle = self.first(selector).await?;
        self.driver.click(&handle).await
    }
}

/// Close any residual invite dialog: a visible close control if one
/// exists, otherwise Escape. Errors are swallowed; a failed dismissal must
/// not take the campaign down.
pub async fn dismiss_overlay<D: Driver>(driver: &D) {
    if let Ok(handles) = driver.locate(selectors::OVERLAY_CLOSE).await
        && let Some(close) = handles.first()
        && driver.is_visible(close, 1_000).await
    {
        let _ = driver.click(close).await;
        driver.sleep(500).await;
        return;
    }
    let _ = driver.press_key("Escape").await;
    driver.sleep(500).await;
}
