use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::UrlsSubmitted => {
            // A finishing or finished run takes no new intake; resubmitting a
            // URL means starting a fresh run.
            match state.session() {
                SessionState::Finishing | SessionState::Finished => {
                    return (state, Vec::new());
                }
                SessionState::Idle | SessionState::Running => {}
            }

            let (enqueued, stats) = state.enqueue_from_input();
            state.set_last_submit(stats);
            if enqueued.is_empty() {
                return (state, Vec::new());
            }

            let should_start = state.session() == SessionState::Idle;
            if should_start {
                state.start_session();
            }

            let mut effects = Vec::with_capacity(enqueued.len() + usize::from(should_start));
            if should_start {
                effects.push(Effect::StartSession);
            }
            for (job_id, url) in enqueued {
                effects.push(Effect::EnqueueUrl { job_id, url });
            }
            effects
        }
        Msg::StopRequested => {
            if state.session() == SessionState::Running {
                state.finish_session();
                vec![Effect::StopAfterCurrent]
            } else {
                Vec::new()
            }
        }
        Msg::JobProgress { job_id, stage } => {
            state.apply_progress(job_id, stage);
            Vec::new()
        }
        Msg::VariantDone {
            job_id,
            tag,
            success,
        } => {
            state.apply_variant(job_id, tag, success);
            Vec::new()
        }
        Msg::JobDone { job_id, result } => {
            state.apply_done(job_id, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
