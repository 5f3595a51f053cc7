use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pdfpress_engine::{
    DialogHandle, DialogMediatedExport, DirectCaptureExport, DriverError, ExportSettings,
    FailureKind, LanguageVariant, PageSession, SaveDialogDriver, VariantExporter, VariantOutcome,
    WatchSettings,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Page whose selectors and title follow a fixed script. Clicking a label
/// retitles the page, mimicking the language toggle re-render.
struct ScriptedPage {
    title: Mutex<String>,
    retitle_on_click: bool,
    missing_labels: Vec<String>,
    clicks: Mutex<Vec<String>>,
    pdf: Vec<u8>,
}

impl ScriptedPage {
    fn with_title(title: &str) -> Self {
        Self {
            title: Mutex::new(title.to_string()),
            retitle_on_click: false,
            missing_labels: Vec::new(),
            clicks: Mutex::new(Vec::new()),
            pdf: b"%PDF-1.7 scripted".to_vec(),
        }
    }
}

#[async_trait]
impl PageSession for ScriptedPage {
    async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn wait_visible(&self, label: &str, timeout: Duration) -> Result<(), DriverError> {
        if self.missing_labels.iter().any(|missing| missing == label) {
            return Err(DriverError::ElementTimeout {
                label: label.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn click_labeled(&self, label: &str, timeout: Duration) -> Result<(), DriverError> {
        if self.missing_labels.iter().any(|missing| missing == label) {
            return Err(DriverError::ElementTimeout {
                label: label.to_string(),
                timeout,
            });
        }
        self.clicks.lock().unwrap().push(label.to_string());
        if self.retitle_on_click {
            *self.title.lock().unwrap() = format!("{label} Report");
        }
        Ok(())
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.title.lock().unwrap().clone())
    }

    async fn pdf_bytes(&self) -> Result<Vec<u8>, DriverError> {
        Ok(self.pdf.clone())
    }

    async fn trigger_print(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn close(self: Box<Self>) {}
}

fn fast_settings() -> ExportSettings {
    ExportSettings {
        element_timeout: Duration::from_millis(50),
        settle_delay: Duration::from_millis(1),
        inter_variant_delay: Duration::from_millis(1),
        dialog_timeout: Duration::from_millis(50),
        watch: WatchSettings {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_millis(200),
            min_bytes: 8,
        },
        ..ExportSettings::default()
    }
}

#[tokio::test]
async fn direct_capture_names_the_file_from_title_and_tag() {
    let temp = TempDir::new().unwrap();
    let page = ScriptedPage::with_title("My Report");
    let exporter = VariantExporter::new(Arc::new(DirectCaptureExport), &fast_settings());
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    let expected = temp.path().join("My Report_EN.pdf");
    assert_eq!(
        outcome,
        VariantOutcome::Success {
            path: expected.clone()
        }
    );
    assert_eq!(fs::read(&expected).unwrap(), b"%PDF-1.7 scripted");
    assert_eq!(*page.clicks.lock().unwrap(), vec!["英文".to_string()]);
}

#[tokio::test]
async fn title_is_read_after_the_variant_selection() {
    let temp = TempDir::new().unwrap();
    let mut page = ScriptedPage::with_title("Stale Title");
    page.retitle_on_click = true;
    let exporter = VariantExporter::new(Arc::new(DirectCaptureExport), &fast_settings());
    let variant = LanguageVariant::new("中英文", "EN_ZH");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    match outcome {
        VariantOutcome::Success { path } => {
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                "中英文 Report_EN_ZH.pdf"
            );
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_title_falls_back_to_untitled_stamp() {
    let temp = TempDir::new().unwrap();
    let page = ScriptedPage::with_title("");
    let exporter = VariantExporter::new(Arc::new(DirectCaptureExport), &fast_settings());
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    match outcome {
        VariantOutcome::Success { path } => {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let stamp = name
                .strip_prefix("untitled_")
                .and_then(|rest| rest.strip_suffix("_EN.pdf"))
                .unwrap_or_else(|| panic!("unexpected name {name}"));
            assert_eq!(stamp.len(), 6);
            assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_selector_is_a_recorded_element_timeout() {
    let temp = TempDir::new().unwrap();
    let mut page = ScriptedPage::with_title("My Report");
    page.missing_labels = vec!["英文".to_string()];
    let exporter = VariantExporter::new(Arc::new(DirectCaptureExport), &fast_settings());
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    match outcome {
        VariantOutcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::ElementTimeout),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

/// Dialog backend that "saves" by writing scripted bytes at the filename it
/// was handed, like the OS save pipeline would.
struct ScriptedDialog {
    saved_to: Mutex<Option<PathBuf>>,
    bytes_on_confirm: Vec<u8>,
    dialog_appears: bool,
}

impl ScriptedDialog {
    fn saving(bytes: &[u8]) -> Self {
        Self {
            saved_to: Mutex::new(None),
            bytes_on_confirm: bytes.to_vec(),
            dialog_appears: true,
        }
    }
}

#[async_trait]
impl SaveDialogDriver for ScriptedDialog {
    async fn wait_for_dialog(
        &self,
        _title_pattern: &str,
        timeout: Duration,
    ) -> Result<DialogHandle, DriverError> {
        if !self.dialog_appears {
            return Err(DriverError::DialogTimeout { timeout });
        }
        Ok(DialogHandle(1))
    }

    async fn set_filename(&self, _dialog: DialogHandle, target: &Path) -> Result<(), DriverError> {
        *self.saved_to.lock().unwrap() = Some(target.to_path_buf());
        Ok(())
    }

    async fn confirm_save(&self, _dialog: DialogHandle) -> Result<(), DriverError> {
        let target = self
            .saved_to
            .lock()
            .unwrap()
            .clone()
            .expect("confirm before set_filename");
        fs::write(target, &self.bytes_on_confirm).unwrap();
        Ok(())
    }
}

#[tokio::test]
async fn dialog_mediated_export_waits_for_the_artifact() {
    let temp = TempDir::new().unwrap();
    let page = ScriptedPage::with_title("My Report");
    let settings = fast_settings();
    let dialog = Arc::new(ScriptedDialog::saving(b"%PDF-1.7 saved by the dialog"));
    let strategy = Arc::new(DialogMediatedExport::new(dialog.clone(), &settings));
    let exporter = VariantExporter::new(strategy, &settings);
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    let expected = temp.path().join("My Report_EN.pdf");
    assert_eq!(
        outcome,
        VariantOutcome::Success {
            path: expected.clone()
        }
    );
    assert_eq!(dialog.saved_to.lock().unwrap().as_deref(), Some(expected.as_path()));
}

#[tokio::test]
async fn absent_dialog_is_a_recorded_dialog_timeout() {
    let temp = TempDir::new().unwrap();
    let page = ScriptedPage::with_title("My Report");
    let settings = fast_settings();
    let dialog = Arc::new(ScriptedDialog {
        saved_to: Mutex::new(None),
        bytes_on_confirm: Vec::new(),
        dialog_appears: false,
    });
    let strategy = Arc::new(DialogMediatedExport::new(dialog, &settings));
    let exporter = VariantExporter::new(strategy, &settings);
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    match outcome {
        VariantOutcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::DialogTimeout),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn undersized_saved_artifact_is_an_export_timeout() {
    let temp = TempDir::new().unwrap();
    let page = ScriptedPage::with_title("My Report");
    let settings = fast_settings();
    // Four bytes never reaches the eight-byte threshold.
    let dialog = Arc::new(ScriptedDialog::saving(b"stub"));
    let strategy = Arc::new(DialogMediatedExport::new(dialog, &settings));
    let exporter = VariantExporter::new(strategy, &settings);
    let variant = LanguageVariant::new("英文", "EN");

    let outcome = exporter.export_variant(&page, &variant, temp.path()).await;

    match outcome {
        VariantOutcome::Failure { kind, .. } => assert_eq!(kind, FailureKind::ExportTimeout),
        other => panic!("expected failure, got {other:?}"),
    }
}
