use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use press_logging::press_info;

use crate::browser::{BrowserSettings, ChromiumPageDriver};
use crate::driver::PageDriver;
use crate::export::{
    DirectCaptureExport, ExportSettings, ExportStrategy, LanguageVariant, VariantExporter,
};
use crate::job::JobRunner;
use crate::types::{ChannelEventSink, EngineEvent, JobId, JobReport};

/// Language modes of the page family this tool was built for; overridable
/// per deployment.
pub fn default_variants() -> Vec<LanguageVariant> {
    vec![
        LanguageVariant::new("打印中英文", "中英文"),
        LanguageVariant::new("打印英文", "英文"),
        LanguageVariant::new("打印中文", "中文"),
    ]
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Export order; later variants depend on page state toggled by earlier
    /// ones, so the order is part of the configuration.
    pub variants: Vec<LanguageVariant>,
    /// Root under which `AutoGeneratePDF/<YYMMDD>/` is created.
    pub output_root: PathBuf,
    pub export: ExportSettings,
    pub browser: BrowserSettings,
}

impl EngineConfig {
    pub fn default_with_output(output_root: PathBuf) -> Self {
        Self {
            variants: default_variants(),
            output_root,
            export: ExportSettings::default(),
            browser: BrowserSettings::default(),
        }
    }
}

enum EngineCommand {
    Enqueue { job_id: JobId, url: String },
}

/// Handle to the pipeline worker. Jobs enqueue FIFO and run strictly one at
/// a time: the automation session is a singleton external resource that must
/// never be driven from two places at once.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    stop: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Worker over a headless Chromium driver with direct PDF capture.
    pub fn new(config: EngineConfig) -> Self {
        let driver = Arc::new(ChromiumPageDriver::new(config.browser.clone()));
        Self::with_collaborators(config, driver, Arc::new(DirectCaptureExport))
    }

    /// Worker over caller-supplied collaborators. This is how a host plugs
    /// in the dialog-mediated strategy with its platform dialog backend, and
    /// how tests script the capabilities.
    pub fn with_collaborators(
        config: EngineConfig,
        driver: Arc<dyn PageDriver>,
        strategy: Arc<dyn ExportStrategy>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = stop.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");
            let runner = JobRunner::new(
                VariantExporter::new(strategy, &config.export),
                config.variants.clone(),
                config.export.clone(),
                config.output_root.clone(),
            );
            let sink = ChannelEventSink::new(event_tx.clone());
            // Each job is awaited to completion before the next command is
            // taken, which keeps exactly one job in flight.
            while let Ok(EngineCommand::Enqueue { job_id, url }) = cmd_rx.recv() {
                if worker_stop.load(Ordering::SeqCst) {
                    press_info!("Job {job_id} cancelled before start");
                    let _ = event_tx.send(EngineEvent::JobCompleted {
                        job_id,
                        report: JobReport::cancelled(url),
                    });
                    continue;
                }
                let report =
                    runtime.block_on(runner.run(driver.as_ref(), job_id, &url, &sink));
                let _ = event_tx.send(EngineEvent::JobCompleted { job_id, report });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            stop,
        }
    }

    pub fn enqueue(&self, job_id: JobId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Enqueue {
            job_id,
            url: url.into(),
        });
    }

    /// Coarse cancellation: the in-flight job runs to completion; queued
    /// jobs that have not started complete immediately as cancelled.
    pub fn stop_after_current(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}
