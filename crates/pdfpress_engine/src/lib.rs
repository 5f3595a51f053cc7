//! PdfPress engine: page-automation pipeline and export execution.
mod browser;
mod dialog;
mod driver;
mod engine;
mod export;
mod filename;
mod job;
mod outdir;
mod persist;
mod types;
mod watch;

pub use browser::{BrowserSettings, ChromiumPageDriver};
pub use dialog::{DialogHandle, SaveDialogDriver};
pub use driver::{DriverError, PageDriver, PageSession};
pub use engine::{default_variants, EngineConfig, EngineHandle};
pub use export::{
    DialogMediatedExport, DirectCaptureExport, ExportError, ExportSettings, ExportStrategy,
    LanguageVariant, VariantExporter,
};
pub use filename::{fallback_base_name, sanitize_title, variant_file_name};
pub use job::JobRunner;
pub use outdir::{dated_output_dir, OUTPUT_DIR_NAME};
pub use persist::{ensure_output_dir, write_artifact, PersistError};
pub use types::{
    ChannelEventSink, EngineEvent, EventSink, ExportFailure, FailureKind, JobId, JobProgress,
    JobReport, Stage, VariantOutcome, VariantReport,
};
pub use watch::{wait_for_artifact, WatchSettings, WatchVerdict};
