use pdfpress_core::{Effect, JobResultKind, Msg, Stage};
use pdfpress_engine::{EngineEvent, EngineHandle, JobReport};
use press_logging::press_info;

pub fn forward_effects(engine: &EngineHandle, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::StartSession => {
                // The engine worker starts on first enqueue.
                press_info!("Session started");
            }
            Effect::EnqueueUrl { job_id, url } => {
                press_info!("Enqueue job {job_id}: {url}");
                engine.enqueue(job_id, url);
            }
            Effect::StopAfterCurrent => engine.stop_after_current(),
        }
    }
}

pub fn map_event(event: EngineEvent) -> Vec<Msg> {
    match event {
        EngineEvent::Progress(progress) => {
            if let Some(detail) = &progress.detail {
                press_info!("Job {}: {detail}", progress.job_id);
            }
            vec![Msg::JobProgress {
                job_id: progress.job_id,
                stage: map_stage(progress.stage),
            }]
        }
        EngineEvent::VariantCompleted {
            job_id,
            tag,
            outcome,
        } => vec![Msg::VariantDone {
            job_id,
            tag,
            success: outcome.is_success(),
        }],
        EngineEvent::JobCompleted { job_id, report } => vec![Msg::JobDone {
            job_id,
            result: classify_report(&report),
        }],
    }
}

fn map_stage(stage: pdfpress_engine::Stage) -> Stage {
    match stage {
        pdfpress_engine::Stage::Queued => Stage::Queued,
        pdfpress_engine::Stage::Opening => Stage::Opening,
        pdfpress_engine::Stage::Stabilizing => Stage::Stabilizing,
        pdfpress_engine::Stage::Exporting => Stage::Exporting,
        pdfpress_engine::Stage::Done => Stage::Done,
    }
}

pub(crate) fn classify_report(report: &JobReport) -> JobResultKind {
    if report.is_cancelled() {
        JobResultKind::Cancelled
    } else if report.fatal.is_some() {
        JobResultKind::Failed
    } else if report.all_succeeded() {
        JobResultKind::Success
    } else if report
        .variants
        .iter()
        .any(|variant| variant.outcome.is_success())
    {
        JobResultKind::PartialFailure
    } else {
        JobResultKind::Failed
    }
}
