use serde::{Deserialize, Serialize};

/// Relationship state read off a search result's action control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    /// Actionable control present ("Connect" and friends) - outreach target.
    Unconnected,
    /// A request is already out; no new action, still worth logging.
    Pending,
    /// Follow-only relationship; carries no outreach value.
    Following,
    /// No actionable control text at all - already connected, or the page
    /// rendered something we cannot classify. Never treated as an error.
    AlreadyConnectedOrUnknown,
}

/// What happened to a profile during the dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outreach {
    NotAttempted,
    SkippedPending,
    SkippedFollowing,
    Sent,
    /// The note was already typed into the message box when the send
    /// sequence broke. Routed to the failed-send log only.
    FailedAfterMessageWritten,
    /// The sequence broke before the note was written; treated like a
    /// normal skip and kept in the main results log.
    FailedBeforeAction,
}

/// One discovered profile. `profile_url` is the sole identity key; name
/// text can vary between visits to the same profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub profile_url: String,
    pub relationship: Relationship,
    pub outcome: Outreach,
}

impl ProfileRecord {
    pub fn new(name: String, profile_url: String, relationship: Relationship) -> Self {
        Self {
            name,
            profile_url,
            relationship,
            outcome: Outreach::NotAttempted,
        }
    }
}

/// Canonical absolute profile URL: absolute refs pass through, everything
/// else is joined onto the site origin.
pub fn canonical_profile_url(origin: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}
