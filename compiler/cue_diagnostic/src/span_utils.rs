//! Span-to-position utilities.

use cue_ir::Span;

/// 1-based line/column position in a source text.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Convert a byte offset to a 1-based line/column position.
///
/// Offsets past the end of the source clamp to the final position.
pub fn line_col(source: &str, offset: u32) -> LineCol {
    let offset = (offset as usize).min(source.len());
    let mut line = 1u32;
    let mut col = 1u32;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    LineCol { line, col }
}

/// The full text of the line containing `offset` (without its newline).
pub fn line_text(source: &str, offset: u32) -> &str {
    let offset = (offset as usize).min(source.len());
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = source[start..]
        .find('\n')
        .map_or(source.len(), |i| start + i);
    &source[start..end]
}

/// Clamp a span to the line containing its start.
///
/// The underline rendering is single-line; a span crossing a newline is cut
/// at the end of its first line.
pub fn clamp_to_line(source: &str, span: Span) -> Span {
    let line = line_text(source, span.start);
    let line_start = source[..(span.start as usize).min(source.len())]
        .rfind('\n')
        .map_or(0, |i| i + 1);
    let line_end = line_start + line.len();
    Span::new(span.start, span.end.min(u32::try_from(line_end).unwrap_or(span.end)))
}
