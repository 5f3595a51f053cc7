use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Opening,
    Stabilizing,
    Exporting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
    /// Human-readable status line for a host UI.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(JobProgress),
    VariantCompleted {
        job_id: JobId,
        tag: String,
        outcome: VariantOutcome,
    },
    JobCompleted {
        job_id: JobId,
        report: JobReport,
    },
}

/// Result of exporting one (job, variant) pair. A failure may leave partial
/// files behind; they are not cleaned up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantOutcome {
    Success { path: PathBuf },
    Failure { kind: FailureKind, message: String },
}

impl VariantOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VariantOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantReport {
    pub tag: String,
    pub outcome: VariantOutcome,
}

/// Aggregated outcome of one job: per-variant outcomes in export order, plus
/// the fatal failure that cut the job short, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub url: String,
    pub variants: Vec<VariantReport>,
    pub fatal: Option<ExportFailure>,
}

impl JobReport {
    pub fn completed(url: impl Into<String>, variants: Vec<VariantReport>) -> Self {
        Self {
            url: url.into(),
            variants,
            fatal: None,
        }
    }

    pub fn fatal(url: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variants: Vec::new(),
            fatal: Some(ExportFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::fatal(
            url,
            FailureKind::Cancelled,
            "stop requested before the job started",
        )
    }

    pub fn all_succeeded(&self) -> bool {
        self.fatal.is_none() && self.variants.iter().all(|variant| variant.outcome.is_success())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(&self.fatal, Some(failure) if failure.kind == FailureKind::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Navigation,
    ElementTimeout,
    DialogTimeout,
    ExportTimeout,
    DirectoryCreation,
    Capability,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Navigation => write!(f, "navigation failure"),
            FailureKind::ElementTimeout => write!(f, "element timeout"),
            FailureKind::DialogTimeout => write!(f, "save dialog timeout"),
            FailureKind::ExportTimeout => write!(f, "export timeout"),
            FailureKind::DirectoryCreation => write!(f, "directory creation failure"),
            FailureKind::Capability => write!(f, "automation capability failure"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Observer for engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
