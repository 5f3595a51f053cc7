use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::DriverError;

/// Opaque handle to a native save prompt, minted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogHandle(pub u64);

/// OS save-dialog automation, consumed by the dialog-mediated export
/// strategy only. No backend is bundled: dialog automation is an external
/// collaborator supplied by the host platform.
#[async_trait]
pub trait SaveDialogDriver: Send + Sync {
    /// Waits for a native save prompt whose title matches `title_pattern`.
    async fn wait_for_dialog(
        &self,
        title_pattern: &str,
        timeout: Duration,
    ) -> Result<DialogHandle, DriverError>;

    async fn set_filename(&self, dialog: DialogHandle, target: &Path) -> Result<(), DriverError>;

    async fn confirm_save(&self, dialog: DialogHandle) -> Result<(), DriverError>;
}
