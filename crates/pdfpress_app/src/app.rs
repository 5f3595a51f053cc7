use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use pdfpress_core::{
    update, AppState, JobResultKind, JobRowView, Msg, PipelineViewModel, SessionState, Stage,
};
use pdfpress_engine::EngineHandle;
use press_logging::{press_info, press_warn, LogDestination};

use crate::effects::{forward_effects, map_event};
use crate::settings;
use crate::Cli;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run(cli: Cli) -> anyhow::Result<()> {
    press_logging::initialize(if cli.quiet {
        LogDestination::File
    } else {
        LogDestination::Both
    });

    let mut urls = cli.urls.clone();
    if let Some(path) = &cli.url_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        urls.extend(
            text.lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
        );
    }
    anyhow::ensure!(
        !urls.is_empty(),
        "no URLs given; pass them as arguments or via --url-file"
    );

    let output_root = resolve_output_root(cli.output_root.clone())?;
    let profile = settings::load(cli.settings.as_deref());
    let config = profile.into_engine_config(output_root.clone());
    press_info!(
        "Exporting {} URL(s) under {}",
        urls.len(),
        output_root.display()
    );

    let engine = EngineHandle::new(config);
    let mut state = AppState::new();
    dispatch(&mut state, &engine, Msg::InputChanged(urls.join("\n")));
    dispatch(&mut state, &engine, Msg::UrlsSubmitted);

    let view = state.view();
    if let Some(stats) = &view.last_submit {
        if stats.rejected > 0 {
            press_warn!("{} URL(s) rejected (not http/https)", stats.rejected);
        }
        if stats.duplicates > 0 {
            press_info!("{} duplicate URL(s) skipped", stats.duplicates);
        }
    }
    anyhow::ensure!(view.job_count > 0, "no valid http(s) URLs to process");
    state.consume_dirty();
    println!("Queued {} job(s).", view.job_count);

    loop {
        let mut idle = true;
        while let Some(event) = engine.try_recv() {
            idle = false;
            for msg in map_event(event) {
                dispatch(&mut state, &engine, msg);
            }
        }
        if state.consume_dirty() {
            render_progress(&state.view());
        }
        if state.view().session == SessionState::Finished {
            break;
        }
        if idle {
            thread::sleep(EVENT_POLL_INTERVAL);
        }
    }

    render_summary(&state.view());
    Ok(())
}

fn dispatch(state: &mut AppState, engine: &EngineHandle, msg: Msg) {
    let (next, effects) = update(std::mem::take(state), msg);
    *state = next;
    forward_effects(engine, effects);
}

/// Output root precedence: explicit flag, then the user's desktop (the
/// folder the generated tree is expected on), then the working directory.
fn resolve_output_root(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    if let Some(desktop) = dirs::desktop_dir() {
        return Ok(desktop);
    }
    std::env::current_dir().context("resolving the current directory as output root")
}

fn render_progress(view: &PipelineViewModel) {
    if let Some(job) = view.jobs.iter().find(|job| job.outcome.is_none()) {
        println!(
            "[{}/{}] {} {}",
            view.completed_count,
            view.job_count,
            stage_label(job.stage),
            job.url
        );
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Queued => "queued",
        Stage::Opening => "opening",
        Stage::Stabilizing => "stabilizing",
        Stage::Exporting => "exporting",
        Stage::Done => "done",
    }
}

fn render_summary(view: &PipelineViewModel) {
    let mut succeeded = 0usize;
    let mut partial = 0usize;
    let mut failed = 0usize;
    let mut cancelled = 0usize;
    for job in &view.jobs {
        match job.outcome {
            Some(JobResultKind::Success) => succeeded += 1,
            Some(JobResultKind::PartialFailure) => partial += 1,
            Some(JobResultKind::Failed) => failed += 1,
            Some(JobResultKind::Cancelled) => cancelled += 1,
            None => {}
        }
    }
    println!(
        "{}",
        summary_line(view.job_count, succeeded, partial, failed, cancelled)
    );
    for job in &view.jobs {
        if job.outcome != Some(JobResultKind::Success) {
            println!("  {}", job_failure_line(job));
        }
    }
}

fn summary_line(
    total: usize,
    succeeded: usize,
    partial: usize,
    failed: usize,
    cancelled: usize,
) -> String {
    let mut line = format!("Processed {total} job(s): {succeeded} succeeded");
    if partial > 0 {
        line.push_str(&format!(", {partial} partially failed"));
    }
    if failed > 0 {
        line.push_str(&format!(", {failed} failed"));
    }
    if cancelled > 0 {
        line.push_str(&format!(", {cancelled} cancelled"));
    }
    line
}

fn job_failure_line(job: &JobRowView) -> String {
    let failed_tags: Vec<&str> = job
        .variants
        .iter()
        .filter(|mark| !mark.success)
        .map(|mark| mark.tag.as_str())
        .collect();
    let reason = match job.outcome {
        Some(JobResultKind::Cancelled) => "cancelled before start".to_string(),
        Some(JobResultKind::Failed) if failed_tags.is_empty() => "aborted before export".to_string(),
        _ => format!("failed variants: {}", failed_tags.join(", ")),
    };
    format!("{} — {}", job.url, reason)
}
