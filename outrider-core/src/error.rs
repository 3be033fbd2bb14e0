use outrider_driver::DriverError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no stored session and no credentials; set {0}")]
    MissingCredentials(String),

    #[error("login did not reach the authenticated feed: {0}")]
    LoginFailed(String),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Error, Debug)]
pub enum CampaignError {
    /// Fatal: nothing is scraped without a valid session.
    #[error("session could not be established: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("failed to write log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid search url: {0}")]
    SearchUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, CampaignError>;
