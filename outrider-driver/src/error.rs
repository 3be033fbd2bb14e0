use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("timed out after {timeout_ms}ms waiting for '{selector}'")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("no element matched '{0}'")]
    NotFound(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DriverError>;
