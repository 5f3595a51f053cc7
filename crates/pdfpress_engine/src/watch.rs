use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// Delay between filesystem checks.
    pub poll_interval: Duration,
    /// Total budget before the export counts as timed out.
    pub timeout: Duration,
    /// Smallest length a finished artifact can have; guards against the
    /// zero-byte placeholder the OS may create before writing finishes.
    pub min_bytes: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            min_bytes: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchVerdict {
    Complete,
    TimedOut,
}

/// Polls until the artifact at `path` exists with at least
/// `settings.min_bytes`, or the timeout budget elapses. The export mechanism
/// offers no completion callback, so completion is inferred by polling.
///
/// The last poll lands at or after the deadline and still counts, so an
/// artifact arriving exactly at the timeout is `Complete`.
pub async fn wait_for_artifact(path: &Path, settings: &WatchSettings) -> WatchVerdict {
    let deadline = Instant::now() + settings.timeout;
    loop {
        if artifact_ready(path, settings.min_bytes) {
            return WatchVerdict::Complete;
        }
        let now = Instant::now();
        if now >= deadline {
            return WatchVerdict::TimedOut;
        }
        tokio::time::sleep((deadline - now).min(settings.poll_interval)).await;
    }
}

fn artifact_ready(path: &Path, min_bytes: u64) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() >= min_bytes)
        .unwrap_or(false)
}
