//! PdfPress core: pure pipeline state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    is_supported_url, normalize_url_for_dedupe, AppState, JobId, JobResultKind, SessionState,
    Stage, VariantMark,
};
pub use update::update;
pub use view_model::{JobRowView, PipelineViewModel, SubmitStats};
