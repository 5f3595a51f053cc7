use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use press_logging::press_info;
use thiserror::Error;

use crate::dialog::SaveDialogDriver;
use crate::driver::{DriverError, PageSession};
use crate::filename::{fallback_base_name, sanitize_title, variant_file_name};
use crate::persist::{write_artifact, PersistError};
use crate::types::{FailureKind, VariantOutcome};
use crate::watch::{wait_for_artifact, WatchSettings, WatchVerdict};

/// One selectable language mode of the page: the visible label used to
/// select it and the tag suffixed to exported filenames. Configuration, in
/// export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVariant {
    pub selector_label: String,
    pub tag: String,
}

impl LanguageVariant {
    pub fn new(selector_label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            selector_label: selector_label.into(),
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Bounded wait for a variant selector (and the readiness probe).
    pub element_timeout: Duration,
    /// Re-render allowance after selecting a variant.
    pub settle_delay: Duration,
    /// Pause between variants so the browser engine settles.
    pub inter_variant_delay: Duration,
    /// Bounded wait for the native save prompt (dialog strategy).
    pub dialog_timeout: Duration,
    /// Title pattern of the native save prompt (dialog strategy).
    pub dialog_title_pattern: String,
    /// Throwaway capture during stabilization to warm up print styling.
    pub priming_export: bool,
    pub watch: WatchSettings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(20),
            settle_delay: Duration::from_millis(2500),
            inter_variant_delay: Duration::from_secs(2),
            dialog_timeout: Duration::from_secs(10),
            dialog_title_pattern: "Save As".to_string(),
            priming_export: true,
            watch: WatchSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("export did not complete within {0:?}")]
    Timeout(Duration),
}

impl ExportError {
    pub(crate) fn failure_kind(&self) -> FailureKind {
        match self {
            ExportError::Driver(DriverError::Navigation(_)) => FailureKind::Navigation,
            ExportError::Driver(DriverError::ElementTimeout { .. }) => FailureKind::ElementTimeout,
            ExportError::Driver(DriverError::DialogTimeout { .. }) => FailureKind::DialogTimeout,
            ExportError::Driver(DriverError::Backend(_)) => FailureKind::Capability,
            ExportError::Persist(_) => FailureKind::Capability,
            ExportError::Timeout(_) => FailureKind::ExportTimeout,
        }
    }
}

/// Writes the current view of an open page to `target`, by whichever
/// mechanism the deployment selected. Callers never learn which ran.
#[async_trait]
pub trait ExportStrategy: Send + Sync {
    async fn export(&self, page: &dyn PageSession, target: &Path) -> Result<(), ExportError>;
}

/// In-process capture: render PDF bytes over the automation capability and
/// write them out directly. Completion is synchronous.
pub struct DirectCaptureExport;

#[async_trait]
impl ExportStrategy for DirectCaptureExport {
    async fn export(&self, page: &dyn PageSession, target: &Path) -> Result<(), ExportError> {
        let bytes = page.pdf_bytes().await?;
        write_artifact(target, &bytes)?;
        Ok(())
    }
}

/// Save-prompt flow: trigger the in-page print action, drive the native
/// dialog to the target path, then watch the filesystem. The OS save
/// pipeline is asynchronous and offers no callback.
pub struct DialogMediatedExport {
    dialog: Arc<dyn SaveDialogDriver>,
    dialog_timeout: Duration,
    dialog_title_pattern: String,
    watch: WatchSettings,
}

impl DialogMediatedExport {
    pub fn new(dialog: Arc<dyn SaveDialogDriver>, settings: &ExportSettings) -> Self {
        Self {
            dialog,
            dialog_timeout: settings.dialog_timeout,
            dialog_title_pattern: settings.dialog_title_pattern.clone(),
            watch: settings.watch.clone(),
        }
    }
}

#[async_trait]
impl ExportStrategy for DialogMediatedExport {
    async fn export(&self, page: &dyn PageSession, target: &Path) -> Result<(), ExportError> {
        page.trigger_print().await?;
        let handle = self
            .dialog
            .wait_for_dialog(&self.dialog_title_pattern, self.dialog_timeout)
            .await?;
        self.dialog.set_filename(handle, target).await?;
        self.dialog.confirm_save(handle).await?;
        match wait_for_artifact(target, &self.watch).await {
            WatchVerdict::Complete => Ok(()),
            WatchVerdict::TimedOut => Err(ExportError::Timeout(self.watch.timeout)),
        }
    }
}

/// Executes one language variant against an already-open page and reports a
/// [`VariantOutcome`]. Every failure is converted at this boundary; nothing
/// propagates upward.
pub struct VariantExporter {
    strategy: Arc<dyn ExportStrategy>,
    element_timeout: Duration,
    settle_delay: Duration,
}

impl VariantExporter {
    pub fn new(strategy: Arc<dyn ExportStrategy>, settings: &ExportSettings) -> Self {
        Self {
            strategy,
            element_timeout: settings.element_timeout,
            settle_delay: settings.settle_delay,
        }
    }

    pub async fn export_variant(
        &self,
        page: &dyn PageSession,
        variant: &LanguageVariant,
        out_dir: &Path,
    ) -> VariantOutcome {
        match self.try_export(page, variant, out_dir).await {
            Ok(path) => VariantOutcome::Success { path },
            Err(err) => VariantOutcome::Failure {
                kind: err.failure_kind(),
                message: err.to_string(),
            },
        }
    }

    async fn try_export(
        &self,
        page: &dyn PageSession,
        variant: &LanguageVariant,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        page.click_labeled(&variant.selector_label, self.element_timeout)
            .await?;
        // The page re-renders (and may retitle itself) under the new
        // variant; the title must be read after this settles.
        tokio::time::sleep(self.settle_delay).await;
        let title = page.title().await?;
        let mut base = sanitize_title(&title);
        if base.is_empty() {
            base = fallback_base_name(Local::now());
            press_info!("Empty page title, falling back to {base}");
        }
        let target = out_dir.join(variant_file_name(&base, &variant.tag));
        self.strategy.export(page, &target).await?;
        Ok(target)
    }
}
