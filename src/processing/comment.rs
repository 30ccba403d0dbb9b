use crate::languages::grammar::{BlockStyle, Grammar};
use crate::models::span::{Span, SpanKind};
use std::ops::Range;

/// Prose recovered from one or more adjacent comment spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedComment {
    pub text: String,
    pub is_documentation: bool,
    /// Whitespace preceding the first comment on its line
    pub indent: String,
    /// Source range covered, including `indent`
    pub range: Range<usize>,
}

/// Strips comment delimiters and per-line decoration
pub struct CommentNormalizer<'g> {
    grammar: &'g Grammar,
}

impl<'g> CommentNormalizer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Documentation class of a span, `None` for code and string literals
    pub fn is_documentation(&self, span: &Span<'_>) -> Option<bool> {
        match span.kind {
            SpanKind::LineComment { marker } => {
                Some(self.grammar.line_marker(marker).documentation)
            }
            SpanKind::BlockComment { style, .. } => {
                Some(self.grammar.block_style(style).documentation)
            }
            SpanKind::Code | SpanKind::StringLiteral { .. } => None,
        }
    }

    /// Normalize a run of adjacent comment spans into one comment.
    ///
    /// Returns `None` for an empty run, a run containing non-comment spans,
    /// or a run that mixes documentation and incidental comments.
    pub fn normalize(&self, source: &str, spans: &[&Span<'_>]) -> Option<NormalizedComment> {
        let first = spans.first()?;
        let last = spans.last()?;

        let is_documentation = self.is_documentation(first)?;
        for span in spans {
            if self.is_documentation(span)? != is_documentation {
                return None;
            }
        }

        let text = spans
            .iter()
            .map(|span| self.normalize_span(span))
            .collect::<Vec<_>>()
            .join("\n");

        let line_start = source[..first.start()].rfind('\n').map_or(0, |i| i + 1);
        let leading = &source[line_start..first.start()];
        let indent = if leading.chars().all(|c| c == ' ' || c == '\t') {
            leading.to_string()
        } else {
            String::new()
        };

        Some(NormalizedComment {
            text,
            is_documentation,
            range: first.start() - indent.len()..last.end(),
            indent,
        })
    }

    fn normalize_span(&self, span: &Span<'_>) -> String {
        match span.kind {
            SpanKind::LineComment { marker } => {
                let marker = &self.grammar.line_marker(marker).marker;
                let body = span.text.strip_prefix(marker.as_str()).unwrap_or(span.text);
                strip_one_blank(body).to_string()
            }
            SpanKind::BlockComment { style, terminated } => {
                let style = self.grammar.block_style(style);
                let body = span.text.strip_prefix(style.start.as_str()).unwrap_or(span.text);
                let body = if terminated {
                    body.strip_suffix(style.end.as_str()).unwrap_or(body)
                } else {
                    body
                };
                normalize_block(body, style)
            }
            SpanKind::Code | SpanKind::StringLiteral { .. } => span.text.to_string(),
        }
    }
}

/// Remove decoration from a block comment body. The first line only loses
/// leading whitespace, interior lines lose one continuation marker when
/// present, and surrounding blank lines are dropped.
fn normalize_block(body: &str, style: &BlockStyle) -> String {
    let mut lines: Vec<&str> = body
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if i == 0 {
                line.trim_start()
            } else {
                style.strip_continuation(line)
            }
        })
        .collect();

    if let Some(last) = lines.last_mut() {
        *last = last.trim_end();
    }

    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());

    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

fn strip_one_blank(text: &str) -> &str {
    text.strip_prefix(' ')
        .or_else(|| text.strip_prefix('\t'))
        .unwrap_or(text)
}
