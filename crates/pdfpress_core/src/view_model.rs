use crate::{JobId, JobResultKind, SessionState, Stage, VariantMark};

/// Counters for the most recent URL submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitStats {
    pub enqueued: usize,
    pub rejected: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineViewModel {
    pub session: SessionState,
    pub job_count: usize,
    pub completed_count: usize,
    pub jobs: Vec<JobRowView>,
    pub last_submit: Option<SubmitStats>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub url: String,
    pub stage: Stage,
    pub variants: Vec<VariantMark>,
    pub outcome: Option<JobResultKind>,
}
