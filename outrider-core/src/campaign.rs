use crate::dedup::{append_records, DedupIndex};
use crate::dispatch::Dispatcher;
use crate::error::{CampaignError, Result};
use crate::options::{CampaignOptions, SessionOptions};
use crate::paginate::Paginator;
use crate::record::ProfileRecord;
use crate::selectors;
use crate::session;
use outrider_driver::Driver;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

const SEARCH_RENDER_MS: u64 = 15_000;
const SEARCH_SETTLE_MS: u64 = 2_000;

/// Outcome of one campaign invocation. Zero new results is a successful
/// no-op, not an error.
#[derive(Debug)]
pub struct CampaignReport {
    /// Net-new profiles appended to the main results log this run.
    pub new_results: Vec<ProfileRecord>,
    /// Profiles whose note was written but whose send broke; failed-send
    /// log only.
    pub failed: Vec<ProfileRecord>,
    /// Historical log files that fed the dedup index.
    pub files_scanned: usize,
}

/// One full campaign: session, search, dedup load, paginated dispatch,
/// partitioned persistence.
pub async fn run_campaign<D: Driver>(
    driver: &D,
    session_opts: &SessionOptions,
    opts: &CampaignOptions,
) -> Result<CampaignReport> {
    session::ensure_session(driver, session_opts).await?;
    open_search(driver, opts).await?;

    let (index, files_scanned) = DedupIndex::load(&opts.results_dir, &opts.log_stem);
    if files_scanned > 0 {
        info!(
            "loaded {} known profiles from {} existing log file(s)",
            index.len(),
            files_scanned
        );
    }

    let dispatcher = Dispatcher::new(driver, &opts.origin, &opts.note, &opts.timeouts);
    let paginator = Paginator::new(driver, dispatcher, opts.stagnation_limit, &opts.timeouts);

    let mut failed = Vec::new();
    let new_results = paginator.collect(opts.target, &index, &mut failed).await?;

    persist(&new_results, &opts.main_log_path())?;
    persist(
        &new_results,
        &opts.run_snapshot_path(chrono::Local::now().date_naive()),
    )?;
    persist(&failed, &opts.failed_log_path())?;

    if new_results.is_empty() && failed.is_empty() {
        info!("no new profiles this run (all already recorded)");
    }

    Ok(CampaignReport {
        new_results,
        failed,
        files_scanned,
    })
}

/// People-search URL for the query, with the campaign's fixed facets
/// (second-degree network, single geo region).
pub fn search_url(origin: &str, query: &str) -> Result<Url> {
    let base = format!("{}/search/results/people/", origin.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &base,
        &[
            ("keywords", query),
            ("origin", "FACETED_SEARCH"),
            ("network", r#"["S"]"#),
            ("geoUrn", r#"["103644278"]"#),
        ],
    )?;
    Ok(url)
}

async fn open_search<D: Driver>(driver: &D, opts: &CampaignOptions) -> Result<()> {
    info!("searching for \"{}\"...", opts.query);
    let url = search_url(&opts.origin, &opts.query)?;
    driver.navigate(url.as_str()).await?;
    driver
        .wait_for_selector(selectors::RESULT_TITLE_LINK, SEARCH_RENDER_MS)
        .await?;
    driver.sleep(SEARCH_SETTLE_MS).await;
    info!("search page loaded");
    Ok(())
}

fn persist(records: &[ProfileRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let appended = append_records(path, records).map_err(|source| CampaignError::LogWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("appended {} row(s) to {}", appended, path.display());
    if appended != records.len() {
        warn!(
            "expected to append {} rows but wrote {}",
            records.len(),
            appended
        );
    }
    Ok(())
}
