// Error handling framework

use thiserror::Error;

/// Refresh scheduling errors
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Refresh target is not representable on this clock")]
    UnrepresentableTarget,

    #[error("Computed refresh delay is not positive: {delay_ms} ms")]
    NonPositiveDelay { delay_ms: i64 },

    #[error("Reload request failed: {0}")]
    ReloadFailed(String),
}

/// Display data errors
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to read speedtest log: {0}")]
    LogUnreadable(#[from] std::io::Error),

    #[error("Failed to parse speedtest log: {0}")]
    LogUnparseable(#[from] csv::Error),
}
