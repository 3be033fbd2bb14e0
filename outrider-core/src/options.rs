use std::path::PathBuf;

pub const DEFAULT_ORIGIN: &str = "https://www.linkedin.com";

/// Fixed note sent with every connection request. The follow-up scanner's
/// default target phrase must stay a prefix of this text.
pub const DEFAULT_NOTE: &str = "Hi! I'm exploring my next remote contract role. I'm a Lead \
    Full-Stack Engineer (Python + TypeScript) with 15+ years of experience. I'd love to see if \
    there's an opportunity on your team.";

pub const DEFAULT_TARGET_SNIPPET: &str = "Hi! I'm exploring my next remote contract role.";

pub const DEFAULT_FOLLOWUP_TEMPLATE: &str = "Thanks for connecting, {first_name}! Quick \
    question - is your team hiring remote contract engineers right now? I'm a Lead Full-Stack \
    (Python + TypeScript). If not you, who's the best person to talk to?";

/// Stem shared by the global results log and the dated run snapshots; the
/// dedup loader unions every `<stem>*.csv` in the results directory.
pub const RESULTS_LOG_STEM: &str = "outreach-results";

/// Deliberately outside the dedup naming convention: failed sends stay
/// eligible for a retry on the next run.
pub const FAILED_LOG_NAME: &str = "outreach-failed-sends.csv";

#[derive(Debug, Clone)]
pub struct ActionTimeouts {
    /// Bound on each note-flow affordance becoming visible.
    pub affordance_ms: u64,
    /// Settle pause after a sent invitation.
    pub cooldown_ms: u64,
    /// Settle pause after clicking to the next page.
    pub page_settle_ms: u64,
    /// Bound on a new page's result markers rendering.
    pub page_render_ms: u64,
}

impl Default for ActionTimeouts {
    fn default() -> Self {
        Self {
            affordance_ms: 5_000,
            cooldown_ms: 10_000,
            page_settle_ms: 2_000,
            page_render_ms: 10_000,
        }
    }
}

/// Options for one campaign invocation.
#[derive(Debug, Clone)]
pub struct CampaignOptions {
    pub query: String,
    pub target: usize,
    pub results_dir: PathBuf,
    pub log_stem: String,
    pub failed_log_name: String,
    pub note: String,
    pub origin: String,
    pub stagnation_limit: u32,
    pub timeouts: ActionTimeouts,
}

impl CampaignOptions {
    pub fn new(query: impl Into<String>, target: usize, results_dir: PathBuf) -> Self {
        Self {
            query: query.into(),
            target,
            results_dir,
            log_stem: RESULTS_LOG_STEM.to_string(),
            failed_log_name: FAILED_LOG_NAME.to_string(),
            note: DEFAULT_NOTE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            stagnation_limit: 5,
            timeouts: ActionTimeouts::default(),
        }
    }

    pub fn main_log_path(&self) -> PathBuf {
        self.results_dir.join(format!("{}.csv", self.log_stem))
    }

    pub fn run_snapshot_path(&self, date: chrono::NaiveDate) -> PathBuf {
        self.results_dir
            .join(format!("{}-{}.csv", self.log_stem, date.format("%Y-%m-%d")))
    }

    pub fn failed_log_path(&self) -> PathBuf {
        self.results_dir.join(&self.failed_log_name)
    }
}

/// Credentials for the fallback login; a persisted browser profile makes
/// them unnecessary on subsequent runs.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub email: Option<String>,
    pub password: Option<String>,
    pub origin: String,
}

impl SessionOptions {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self {
            email,
            password,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

/// Options for the inbox follow-up flow.
#[derive(Debug, Clone)]
pub struct FollowupOptions {
    pub target_snippet: String,
    pub template: String,
    pub max_scroll_passes: u32,
    pub max_send: u32,
    pub cooldown_ms: u64,
    pub origin: String,
}

impl Default for FollowupOptions {
    fn default() -> Self {
        Self {
            target_snippet: DEFAULT_TARGET_SNIPPET.to_string(),
            template: DEFAULT_FOLLOWUP_TEMPLATE.to_string(),
            max_scroll_passes: 15,
            max_send: 1,
            cooldown_ms: 10_000,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}
