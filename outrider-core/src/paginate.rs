use crate::dedup::DedupIndex;
use crate::dispatch::{dismiss_overlay, Dispatcher};
use crate::options::ActionTimeouts;
use crate::record::ProfileRecord;
use crate::selectors;
use outrider_driver::Driver;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Drives repeated page scans through the dispatcher, enforcing the target
/// cap and both termination families: hard stops (target reached, next
/// control unusable) and the stagnation soft stop.
pub struct Paginator<'a, D: Driver> {
    driver: &'a D,
    dispatcher: Dispatcher<'a, D>,
    stagnation_limit: u32,
    timeouts: &'a ActionTimeouts,
}

impl<'a, D: Driver> Paginator<'a, D> {
    pub fn new(
        driver: &'a D,
        dispatcher: Dispatcher<'a, D>,
        stagnation_limit: u32,
        timeouts: &'a ActionTimeouts,
    ) -> Self {
        Self {
            driver,
            dispatcher,
            stagnation_limit,
            timeouts,
        }
    }

    /// Collect up to `target` net-new profiles, in discovery order.
    /// Failed-after-write profiles land in `failed` and do not count
    /// toward the target.
    pub async fn collect(
        &self,
        target: usize,
        index: &DedupIndex,
        failed: &mut Vec<ProfileRecord>,
    ) -> Result<Vec<ProfileRecord>, outrider_driver::DriverError> {
        let mut results: Vec<ProfileRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page_number = 1u32;
        let mut stagnant_pages = 0u32;

        while results.len() < target {
            info!("processing page {}", page_number);

            let failed_before = failed.len();
            let page_records = self
                .dispatcher
                .scan_page(target - results.len(), &mut seen, index, failed)
                .await?;

            let net_new = page_records.len() + (failed.len() - failed_before);
            for (i, record) in page_records.iter().enumerate() {
                info!("{}. {}", results.len() + i + 1, record.name);
            }
            results.extend(page_records);

            if net_new == 0 {
                stagnant_pages += 1;
                debug!(
                    "no new profiles on this page ({}/{})",
                    stagnant_pages, self.stagnation_limit
                );
                if stagnant_pages >= self.stagnation_limit {
                    info!("stopping: {} consecutive stagnant pages", stagnant_pages);
                    break;
                }
            } else {
                stagnant_pages = 0;
            }

            if results.len() >= target {
                info!("reached target of {} profiles", target);
                break;
            }

            if !self.next_page_usable().await {
                info!("reached end of results (next page unavailable)");
                break;
            }

            // A leftover invite dialog would swallow the next click.
            dismiss_overlay(self.driver).await;
            self.advance_page().await;
            page_number += 1;
        }

        Ok(results)
    }

    /// The next-page control is usable only when it is visible, not
    /// disabled, and not `aria-disabled="true"`. All three must hold.
    async fn next_page_usable(&self) -> bool {
        let handles = match self.driver.locate(selectors::NEXT_PAGE_BUTTON).await {
            Ok(handles) => handles,
            Err(_) => return false,
        };
        let Some(next) = handles.first() else {
            return false;
        };
        if !self.driver.is_visible(next, 1_000).await {
            return false;
        }
        if self.driver.is_disabled(next).await.unwrap_or(false) {
            return false;
        }
        if let Ok(Some(value)) = self.driver.attribute(next, "aria-disabled").await
            && value == "true"
        {
            return false;
        }
        true
    }

    /// Click next and wait for the new page's result markers. A page whose
    /// results never render is not an error: the next scan finds nothing
    /// on it and counts it as stagnant, exactly once.
    async fn advance_page(&self) {
        let handles = match self.driver.locate(selectors::NEXT_PAGE_BUTTON).await {
            Ok(handles) => handles,
            Err(_) => return,
        };
        let Some(next) = handles.first() else {
            return;
        };
        if let Err(e) = self.driver.click(next).await {
            warn!("next page click failed: {}", e);
            return;
        }

        self.driver.sleep(self.timeouts.page_settle_ms).await;
        if let Err(e) = self
            .driver
            .wait_for_selector(selectors::RESULT_TITLE_LINK, self.timeouts.page_render_ms)
            .await
        {
            warn!("results never rendered, treating page as empty: {}", e);
        }
    }
}
