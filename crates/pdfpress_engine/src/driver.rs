use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("no clickable element labeled {label:?} within {timeout:?}")]
    ElementTimeout { label: String, timeout: Duration },
    #[error("save dialog not detected within {timeout:?}")]
    DialogTimeout { timeout: Duration },
    #[error("automation backend error: {0}")]
    Backend(String),
}

/// Opens one automation session per job. The session is an exclusive
/// resource: the pipeline never drives two of them at once.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageSession>, DriverError>;
}

/// One open page, owned by the job currently driving it.
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Waits until an element labeled `label` is present, bounded by
    /// `timeout`. Used as the readiness probe after navigation.
    async fn wait_visible(&self, label: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Finds the clickable element whose visible text matches `label` and
    /// clicks it, with a bounded wait for it to appear.
    async fn click_labeled(&self, label: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Current page title. Variant selection may retitle the page, so this
    /// is read per variant, after selection.
    async fn title(&self) -> Result<String, DriverError>;

    /// Renders the current view to a PDF byte stream in-process.
    async fn pdf_bytes(&self) -> Result<Vec<u8>, DriverError>;

    /// Triggers the in-page print action (dialog-mediated exports).
    async fn trigger_print(&self) -> Result<(), DriverError>;

    /// Tears the session down. Infallible by contract; backends log their
    /// cleanup failures instead of surfacing them.
    async fn close(self: Box<Self>);
}
