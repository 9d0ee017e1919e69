//! Plain-text rendering for located evaluation failures.
//!
//! The evaluator reports failures as a message plus an optional source
//! range and script. This crate turns that contract into the text hosts
//! log: `url:line:col - message`, followed by the offending source line
//! with a `~~~` underline beneath the failing range.

pub mod span_utils;

use cue_ir::{Script, Span};

pub use span_utils::{clamp_to_line, line_col, line_text, LineCol};

/// Render a located message against its script.
///
/// Tolerates a missing span or script: whatever is absent is simply left
/// out, so callers never have to pre-check before rendering.
pub fn render_located(message: &str, span: Option<Span>, script: Option<&Script>) -> String {
    let Some(script) = script else {
        return message.to_string();
    };
    let Some(span) = span else {
        return format!("{}: {message}", script.url);
    };

    let pos = line_col(&script.source, span.start);
    let mut out = format!("{}:{}:{} - {message}", script.url, pos.line, pos.col);

    let line = line_text(&script.source, span.start);
    if line.is_empty() {
        return out;
    }
    let clamped = clamp_to_line(&script.source, span);
    // The indent is counted in characters, so the underline must be too,
    // or multibyte lines misplace it.
    let start = (clamped.start as usize).min(script.source.len());
    let end = (clamped.end as usize).min(script.source.len()).max(start);
    let underline_len = script
        .source
        .get(start..end)
        .map_or(1, |range| range.chars().count().max(1));
    out.push('\n');
    out.push_str(line);
    out.push('\n');
    // col is 1-based; indent to the start of the failing range.
    out.push_str(&" ".repeat((pos.col as usize).saturating_sub(1)));
    out.push_str(&"~".repeat(underline_len));
    out
}
