//! Target template rendering.
//!
//! # Template Language
//! ```text
//! ${SCHEME} ${HOST} ${PATH} ${QUERY}   request context, every occurrence
//! %s %v                                next capture group
//! %[N]s %[N]v                          capture group N (1-based), then N+1, ...
//! %%                                   literal '%'
//! ```
//! Any other `%` sequence is copied through, so percent-encoded text such as
//! `%20` survives rendering.
//!
//! # Design Decisions
//! - Two passes: named tokens first, then positional placeholders
//! - `%` inside substituted request data is escaped, it never becomes a placeholder
//! - Placeholder count is checked against captures before anything is written
//! - Output is a header value: control characters are rejected and non-ASCII
//!   is percent-encoded

use std::fmt::Write as _;

use thiserror::Error;

use crate::resolution::context::RequestContext;

/// Failures while rendering a target template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The template references more groups than the pattern captured.
    #[error("template references capture group {referenced} but only {captured} were captured")]
    MissingCapture { referenced: usize, captured: usize },

    /// The rendered text cannot be used as a `Location` value.
    #[error("rendered target {0:?} is not a usable redirect location")]
    InvalidLocation(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Capture(usize),
}

/// Render `template` for one request using the captures of a successful match.
pub fn render_target(
    template: &str,
    context: &RequestContext,
    captures: &[String],
) -> Result<String, RenderError> {
    let named = substitute_named(template, context);
    let segments = scan_positional(&named);

    let highest = segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Capture(index) => Some(*index),
            Segment::Literal(_) => None,
        })
        .max();
    if let Some(index) = highest {
        if index >= captures.len() {
            return Err(RenderError::MissingCapture {
                referenced: index + 1,
                captured: captures.len(),
            });
        }
    }

    let mut rendered = String::with_capacity(named.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Capture(index) => rendered.push_str(&captures[index]),
        }
    }

    finalize_location(rendered)
}

fn substitute_named(template: &str, context: &RequestContext) -> String {
    let tokens = [
        ("${SCHEME}", context.scheme().as_str()),
        ("${HOST}", context.host()),
        ("${PATH}", context.path()),
        ("${QUERY}", context.query()),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tokens.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(&value.replace('%', "%%"));
                rest = &tail[token.len()..];
            }
            None => {
                out.push_str("${");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn scan_positional(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut next_capture = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let rest = &template[i + 1..];
        let placeholder = if rest.starts_with('%') {
            Some((2, Segment::Literal("%")))
        } else if rest.starts_with('s') || rest.starts_with('v') {
            next_capture += 1;
            Some((2, Segment::Capture(next_capture - 1)))
        } else if let Some((index, len)) = explicit_index(rest) {
            next_capture = index + 1;
            Some((1 + len, Segment::Capture(index)))
        } else {
            None
        };

        match placeholder {
            Some((consumed, segment)) => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                segments.push(segment);
                i += consumed;
                literal_start = i;
            }
            None => i += 1,
        }
    }

    if literal_start < template.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }
    segments
}

/// Parse `[N]s` or `[N]v` after a `%`. Returns the zero-based group index
/// and the number of bytes consumed.
fn explicit_index(rest: &str) -> Option<(usize, usize)> {
    let inner = rest.strip_prefix('[')?;
    let close = inner.find(']')?;
    let digits = &inner[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let position: usize = digits.parse().ok()?;
    if position == 0 {
        return None;
    }
    match inner[close + 1..].chars().next()? {
        's' | 'v' => Some((position - 1, close + 3)),
        _ => None,
    }
}

fn finalize_location(rendered: String) -> Result<String, RenderError> {
    if rendered.trim().is_empty() || rendered.chars().any(char::is_control) {
        return Err(RenderError::InvalidLocation(rendered));
    }
    if rendered.is_ascii() {
        return Ok(rendered);
    }

    let mut escaped = String::with_capacity(rendered.len() * 2);
    for byte in rendered.bytes() {
        if byte.is_ascii() {
            escaped.push(byte as char);
        } else {
            let _ = write!(escaped, "%{:02X}", byte);
        }
    }
    Ok(escaped)
}
