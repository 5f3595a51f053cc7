use chrono::{DateTime, Local};

/// Replaces every filesystem-reserved character with `_`, then trims
/// surrounding whitespace. Pure and idempotent; an empty result is the
/// caller's cue to use [`fallback_base_name`].
pub fn sanitize_title(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();
    cleaned.trim().to_string()
}

fn is_reserved(c: char) -> bool {
    matches!(c, '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|')
}

/// Base name for pages without a usable title: `untitled_<HHMMSS>` from the
/// moment the fallback is requested. Unique only at second granularity,
/// which is accepted.
pub fn fallback_base_name(now: DateTime<Local>) -> String {
    format!("untitled_{}", now.format("%H%M%S"))
}

/// `{base}_{tag}.pdf`
pub fn variant_file_name(base: &str, tag: &str) -> String {
    format!("{base}_{tag}.pdf")
}
