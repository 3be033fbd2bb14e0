pub mod campaign;
pub mod classify;
pub mod dedup;
pub mod dispatch;
pub mod error;
pub mod followup;
pub mod options;
pub mod paginate;
pub mod record;
pub mod selectors;
pub mod session;

pub use campaign::{run_campaign, CampaignReport};
pub use classify::classify;
pub use dedup::DedupIndex;
pub use error::{CampaignError, SessionError};
pub use followup::run_followup;
pub use options::{ActionTimeouts, CampaignOptions, FollowupOptions, SessionOptions};
pub use record::{Outreach, ProfileRecord, Relationship};
