#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input (full text).
    InputChanged(String),
    /// User submitted the current URL input for ingestion.
    UrlsSubmitted,
    /// User asked the pipeline to stop after the job currently in flight.
    StopRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Engine progress for a job.
    JobProgress {
        job_id: crate::JobId,
        stage: crate::Stage,
    },
    /// Engine finished one language variant of a job.
    VariantDone {
        job_id: crate::JobId,
        tag: String,
        success: bool,
    },
    /// Engine completion for a job.
    JobDone {
        job_id: crate::JobId,
        result: crate::JobResultKind,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
