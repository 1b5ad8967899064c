//! Locates the JSON object embedded in free-form model output.
//!
//! Model responses mix prose, markdown fences and JSON. Candidates are tried in order:
//! fenced blocks labelled `json`, other fenced blocks that start with `{`, then every bare
//! top-level `{...}` object in the text. Object boundaries come from a brace scanner that
//! understands string literals and escapes, so `"content": "{literal}"` never ends an
//! object early.

use serde_json::Value;

use crate::error::{WireframeError, WireframeResult};

const FENCE: &str = "```";

/// A byte range of the raw text that may hold a JSON object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.start..self.end]
    }
}

/// Parse the first candidate object in `raw` that is valid JSON.
///
/// When no candidate parses, the error of the first candidate is reported with its byte
/// offset in `raw`.
pub fn extract_object(raw: &str) -> WireframeResult<Value> {
    let candidates = json_candidates(raw);
    if candidates.is_empty() {
        return Err(WireframeError::MalformedResponse {
            raw: raw.to_string(),
        });
    }

    let mut first_error = None;
    for span in &candidates {
        match serde_json::from_str::<Value>(span.slice(raw)) {
            Ok(value) if value.is_object() => {
                tracing::debug!(start = span.start, end = span.end, "extracted JSON object");
                return Ok(value);
            }
            Ok(_) => continue,
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(invalid_json(raw, *span, &err));
                }
            }
        }
    }

    Err(first_error.unwrap_or_else(|| WireframeError::MalformedResponse {
        raw: raw.to_string(),
    }))
}

/// All candidate spans in priority order, without duplicates.
pub fn json_candidates(raw: &str) -> Vec<Span> {
    let fences = fenced_blocks(raw);
    let mut spans = Vec::new();

    for block in fences.iter().filter(|b| b.is_json) {
        if let Some(span) = object_in(raw, block.body) {
            push_unique(&mut spans, span);
        }
    }
    for block in fences.iter().filter(|b| !b.is_json) {
        if block.body.slice(raw).trim_start().starts_with('{') {
            if let Some(span) = object_in(raw, block.body) {
                push_unique(&mut spans, span);
            }
        }
    }
    for span in bare_objects(raw) {
        push_unique(&mut spans, span);
    }

    spans
}

fn push_unique(spans: &mut Vec<Span>, span: Span) {
    if !spans.contains(&span) {
        spans.push(span);
    }
}

struct FencedBlock {
    is_json: bool,
    body: Span,
}

/// Markdown fenced blocks. An unterminated fence runs to the end of the text.
fn fenced_blocks(raw: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(found) = raw[pos..].find(FENCE) {
        let open = pos + found;
        let info_start = open + FENCE.len();
        let line_end = raw[info_start..]
            .find('\n')
            .map(|i| info_start + i)
            .unwrap_or(raw.len());
        let info = raw[info_start..line_end].trim();
        let body_start = (line_end + 1).min(raw.len());

        let close = raw[body_start..].find(FENCE).map(|i| body_start + i);
        let body_end = close.unwrap_or(raw.len());

        blocks.push(FencedBlock {
            is_json: info.to_ascii_lowercase().starts_with("json"),
            body: Span {
                start: body_start,
                end: body_end,
            },
        });

        match close {
            Some(c) => pos = c + FENCE.len(),
            None => break,
        }
    }

    blocks
}

/// First object starting inside `region`. The scan may run past the region's end, since a
/// closing fence can legitimately appear inside a JSON string.
fn object_in(raw: &str, region: Span) -> Option<Span> {
    let open = raw[region.start..region.end].find('{')? + region.start;
    match matching_brace(raw, open) {
        Some(end) => Some(Span { start: open, end }),
        None => Some(Span {
            start: open,
            end: region.end,
        }),
    }
}

/// Every top-level `{...}` in the text. An unbalanced object takes the rest of the text
/// and ends the scan.
fn bare_objects(raw: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(found) = raw[pos..].find('{') {
        let open = pos + found;
        match matching_brace(raw, open) {
            Some(end) => {
                spans.push(Span { start: open, end });
                pos = end;
            }
            None => {
                spans.push(Span {
                    start: open,
                    end: raw.len(),
                });
                break;
            }
        }
    }

    spans
}

/// Index one past the brace that closes the `{` at `open`, skipping string contents.
pub fn matching_brace(raw: &str, open: usize) -> Option<usize> {
    let bytes = raw.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn invalid_json(raw: &str, span: Span, err: &serde_json::Error) -> WireframeError {
    let text = span.slice(raw);
    let offset = span.start + offset_of(text, err.line(), err.column());
    let (line, column) = line_column(raw, offset);
    WireframeError::InvalidJson {
        offset,
        line,
        column,
        message: err.to_string(),
        raw: raw.to_string(),
    }
}

/// Byte offset of a 1-based line/column pair as reported by serde_json, clamped to `text`.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line.max(1) {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }
    (line_start + column.saturating_sub(1)).min(text.len())
}

/// 1-based line and column of a byte offset.
pub(crate) fn line_column(raw: &str, offset: usize) -> (usize, usize) {
    let before = &raw.as_bytes()[..offset.min(raw.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    (line, offset - line_start + 1)
}
