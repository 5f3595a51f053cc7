use std::path::{Path, PathBuf};

use press_logging::{press_error, press_info, press_warn};

use crate::driver::{PageDriver, PageSession};
use crate::export::{ExportSettings, LanguageVariant, VariantExporter};
use crate::outdir::dated_output_dir;
use crate::types::{
    EngineEvent, EventSink, FailureKind, JobId, JobProgress, JobReport, Stage, VariantOutcome,
    VariantReport,
};

/// Drives one URL through open → stabilize → per-variant export. Never
/// errors: every failure lands in the returned report.
pub struct JobRunner {
    exporter: VariantExporter,
    variants: Vec<LanguageVariant>,
    settings: ExportSettings,
    output_root: PathBuf,
}

impl JobRunner {
    pub fn new(
        exporter: VariantExporter,
        variants: Vec<LanguageVariant>,
        settings: ExportSettings,
        output_root: PathBuf,
    ) -> Self {
        Self {
            exporter,
            variants,
            settings,
            output_root,
        }
    }

    /// Runs the whole job. The page session is torn down on every exit path
    /// once it has been opened, so the next job always starts clean.
    pub async fn run(
        &self,
        driver: &dyn PageDriver,
        job_id: JobId,
        url: &str,
        sink: &dyn EventSink,
    ) -> JobReport {
        progress(sink, job_id, Stage::Opening, format!("opening {url}"));

        let out_dir = match dated_output_dir(&self.output_root) {
            Ok(dir) => dir,
            Err(err) => {
                press_error!("Job {job_id}: cannot create output directory: {err}");
                return JobReport::fatal(url, FailureKind::DirectoryCreation, err.to_string());
            }
        };

        let session = match driver.open().await {
            Ok(session) => session,
            Err(err) => {
                press_error!("Job {job_id}: cannot open automation session: {err}");
                return JobReport::fatal(url, FailureKind::Navigation, err.to_string());
            }
        };

        let report = self
            .drive_page(session.as_ref(), &out_dir, job_id, url, sink)
            .await;
        session.close().await;
        progress(sink, job_id, Stage::Done, format!("finished {url}"));
        report
    }

    async fn drive_page(
        &self,
        page: &dyn PageSession,
        out_dir: &Path,
        job_id: JobId,
        url: &str,
        sink: &dyn EventSink,
    ) -> JobReport {
        if let Err(err) = page.navigate(url).await {
            press_error!("Job {job_id}: navigation failed: {err}");
            return JobReport::fatal(url, FailureKind::Navigation, err.to_string());
        }

        progress(
            sink,
            job_id,
            Stage::Stabilizing,
            "waiting for the page to become ready".to_string(),
        );
        if let Some(first) = self.variants.first() {
            if let Err(err) = page
                .wait_visible(&first.selector_label, self.settings.element_timeout)
                .await
            {
                press_error!("Job {job_id}: page never became ready: {err}");
                return JobReport::fatal(url, FailureKind::ElementTimeout, err.to_string());
            }
        }

        if self.settings.priming_export {
            // Throwaway capture to warm up print styling before the real
            // exports. Best effort: a failure here must not abort the job.
            match page.pdf_bytes().await {
                Ok(_) => press_info!("Job {job_id}: priming export done"),
                Err(err) => press_warn!("Job {job_id}: priming export failed: {err}"),
            }
            tokio::time::sleep(self.settings.settle_delay).await;
        }

        let mut reports = Vec::with_capacity(self.variants.len());
        for (index, variant) in self.variants.iter().enumerate() {
            progress(
                sink,
                job_id,
                Stage::Exporting,
                format!("exporting variant {}", variant.selector_label),
            );
            let outcome = self.exporter.export_variant(page, variant, out_dir).await;
            match &outcome {
                VariantOutcome::Success { path } => {
                    press_info!("Job {job_id}: saved {}", path.display());
                }
                VariantOutcome::Failure { kind, message } => {
                    press_warn!(
                        "Job {job_id}: variant {} failed ({kind}): {message}",
                        variant.tag
                    );
                }
            }
            sink.emit(EngineEvent::VariantCompleted {
                job_id,
                tag: variant.tag.clone(),
                outcome: outcome.clone(),
            });
            reports.push(VariantReport {
                tag: variant.tag.clone(),
                outcome,
            });
            if index + 1 < self.variants.len() {
                tokio::time::sleep(self.settings.inter_variant_delay).await;
            }
        }

        JobReport::completed(url, reports)
    }
}

fn progress(sink: &dyn EventSink, job_id: JobId, stage: Stage, detail: String) {
    sink.emit(EngineEvent::Progress(JobProgress {
        job_id,
        stage,
        detail: Some(detail),
    }));
}
