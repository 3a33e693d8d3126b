// Startup gate
//
// The speedtest runner and the display share a volume; the display only
// has something to show once the runner has produced its first log row.

use anyhow::{bail, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Block until the speedtest log exists and has content, or the timeout
/// elapses.
#[tracing::instrument]
pub async fn wait_for_log_file(path: &Path, timeout: Duration, poll_every: Duration) -> Result<()> {
    let mut poll = tokio::time::interval(poll_every);
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                match tokio::fs::metadata(path).await {
                    Ok(meta) if meta.len() > 0 => {
                        info!(path = %path.display(), "Log file found and has content");
                        return Ok(());
                    }
                    Ok(_) => {
                        info!(path = %path.display(), "Log file is empty, waiting");
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        info!(path = %path.display(), "Waiting for log file");
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Error checking log file");
                    }
                }
            }
            _ = &mut deadline => {
                bail!("Timed out waiting for log file '{}'", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_returns_once_log_has_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "header").unwrap();
        file.flush().unwrap();

        let result = wait_for_log_file(
            file.path(),
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_log_never_appears() {
        let missing = std::env::temp_dir().join("display-test-no-such-log.csv");

        let result = wait_for_log_file(
            &missing,
            Duration::from_secs(10),
            Duration::from_secs(2),
        )
        .await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_log_keeps_waiting_until_timeout() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let result = wait_for_log_file(
            file.path(),
            Duration::from_secs(10),
            Duration::from_secs(2),
        )
        .await;
        assert!(result.is_err());
    }
}
