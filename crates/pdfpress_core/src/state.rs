use std::collections::{BTreeMap, HashSet};

use url::Url;

use crate::view_model::{JobRowView, PipelineViewModel, SubmitStats};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// Stop requested: the in-flight job finishes, the rest drain as cancelled.
    Finishing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Opening,
    Stabilizing,
    Exporting,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobResultKind {
    /// Every language variant exported.
    Success,
    /// At least one variant exported, at least one failed.
    PartialFailure,
    /// The job aborted before or during export.
    Failed,
    /// The job was queued when a stop was requested and never started.
    Cancelled,
}

/// Outcome of one language variant, as shown in the job row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMark {
    pub tag: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct JobRecord {
    url: String,
    stage: Stage,
    variants: Vec<VariantMark>,
    outcome: Option<JobResultKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    input: String,
    jobs: BTreeMap<JobId, JobRecord>,
    next_job_id: JobId,
    seen_urls: HashSet<String>,
    last_submit: Option<SubmitStats>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn view(&self) -> PipelineViewModel {
        let jobs: Vec<JobRowView> = self
            .jobs
            .iter()
            .map(|(job_id, record)| JobRowView {
                job_id: *job_id,
                url: record.url.clone(),
                stage: record.stage,
                variants: record.variants.clone(),
                outcome: record.outcome,
            })
            .collect();
        let completed_count = jobs.iter().filter(|job| job.outcome.is_some()).count();
        PipelineViewModel {
            session: self.session,
            job_count: self.jobs.len(),
            completed_count,
            jobs,
            last_submit: self.last_submit.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
    }

    pub(crate) fn start_session(&mut self) {
        self.session = SessionState::Running;
        self.mark_dirty();
    }

    pub(crate) fn finish_session(&mut self) {
        self.session = SessionState::Finishing;
        self.mark_dirty();
    }

    /// Consumes the input buffer: one URL per line, trimmed. Lines that are
    /// not http(s) URLs are rejected; URLs already seen this run are skipped.
    /// Accepted URLs become queued job records in submission order.
    pub(crate) fn enqueue_from_input(&mut self) -> (Vec<(JobId, String)>, SubmitStats) {
        let raw = std::mem::take(&mut self.input);
        let mut enqueued = Vec::new();
        let mut stats = SubmitStats::default();
        for line in raw.lines() {
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            if !is_supported_url(url) {
                stats.rejected += 1;
                continue;
            }
            if !self.seen_urls.insert(normalize_url_for_dedupe(url)) {
                stats.duplicates += 1;
                continue;
            }
            self.next_job_id += 1;
            let job_id = self.next_job_id;
            self.jobs.insert(
                job_id,
                JobRecord {
                    url: url.to_string(),
                    stage: Stage::Queued,
                    variants: Vec::new(),
                    outcome: None,
                },
            );
            enqueued.push((job_id, url.to_string()));
            stats.enqueued += 1;
        }
        if stats.enqueued + stats.rejected + stats.duplicates > 0 {
            self.mark_dirty();
        }
        (enqueued, stats)
    }

    pub(crate) fn set_last_submit(&mut self, stats: SubmitStats) {
        self.last_submit = Some(stats);
    }

    pub(crate) fn apply_progress(&mut self, job_id: JobId, stage: Stage) {
        if let Some(record) = self.jobs.get_mut(&job_id) {
            record.stage = stage;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_variant(&mut self, job_id: JobId, tag: String, success: bool) {
        if let Some(record) = self.jobs.get_mut(&job_id) {
            record.variants.push(VariantMark { tag, success });
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_done(&mut self, job_id: JobId, result: JobResultKind) {
        if let Some(record) = self.jobs.get_mut(&job_id) {
            record.stage = Stage::Done;
            record.outcome = Some(result);
            self.mark_dirty();
        }
        self.maybe_finish();
    }

    /// Takes the terminal transition exactly once, when every job carries an
    /// outcome. Once `Finished`, the session never transitions again.
    fn maybe_finish(&mut self) {
        match self.session {
            SessionState::Running | SessionState::Finishing => {}
            SessionState::Idle | SessionState::Finished => return,
        }
        if !self.jobs.is_empty() && self.jobs.values().all(|record| record.outcome.is_some()) {
            self.session = SessionState::Finished;
            self.mark_dirty();
        }
    }
}

/// True for absolute http(s) URLs; everything else is rejected at intake.
pub fn is_supported_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Canonical form used to suppress duplicate submissions: parsed URL
/// serialization (lowercased scheme/host, normalized path). Unparseable
/// input falls back to a lowercased trim so dedupe stays total.
pub fn normalize_url_for_dedupe(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_ascii_lowercase(),
    }
}
