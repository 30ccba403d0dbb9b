use crate::languages::grammar::{Grammar, Opener};
use crate::models::document::{Construct, Diagnostic};
use crate::models::span::{Span, SpanKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InCode,
    InLineComment { marker: usize },
    InBlockComment { style: usize },
    InStringLiteral { delimiter: usize, escape_active: bool },
}

/// Spans covering the whole input, in order, plus recovery diagnostics
#[derive(Debug, Default)]
pub struct Scan<'a> {
    pub spans: Vec<Span<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Single-pass lexer splitting source text into code, comment and string
/// literal spans.
///
/// Comment bodies are not re-lexed, so string delimiters inside comments and
/// comment markers inside strings are inert. Block comments do not nest.
pub struct Scanner<'g> {
    grammar: &'g Grammar,
}

impl<'g> Scanner<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn scan<'a>(&self, source: &'a str) -> Scan<'a> {
        let mut scan = Scan::default();
        let mut state = State::InCode;
        let mut span_start = 0;
        let mut pos = 0;

        while pos < source.len() {
            let rest = &source[pos..];

            match state {
                State::InCode => {
                    if let Some((opener, len)) = self.grammar.opener_at(rest) {
                        push(&mut scan, source, SpanKind::Code, span_start..pos);
                        span_start = pos;
                        pos += len;
                        state = match opener {
                            Opener::LineComment(marker) => State::InLineComment { marker },
                            Opener::BlockComment(style) => State::InBlockComment { style },
                            Opener::StringLiteral(delimiter) => State::InStringLiteral {
                                delimiter,
                                escape_active: false,
                            },
                        };
                    } else {
                        pos += char_len(rest);
                    }
                }
                State::InLineComment { marker } => {
                    let end = pos + line_content_len(rest);
                    push(&mut scan, source, SpanKind::LineComment { marker }, span_start..end);
                    span_start = end;
                    pos = end;
                    state = State::InCode;
                }
                State::InBlockComment { style } => {
                    let end_marker = self.grammar.block_style(style).end.as_str();
                    let (end, terminated) = match rest.find(end_marker) {
                        Some(offset) => (pos + offset + end_marker.len(), true),
                        None => (source.len(), false),
                    };
                    if !terminated {
                        recover(&mut scan, source, Construct::BlockComment, span_start);
                    }
                    push(
                        &mut scan,
                        source,
                        SpanKind::BlockComment { style, terminated },
                        span_start..end,
                    );
                    span_start = end;
                    pos = end;
                    state = State::InCode;
                }
                State::InStringLiteral {
                    delimiter,
                    escape_active,
                } => {
                    let literal = self.grammar.string_delimiter(delimiter);

                    if escape_active {
                        pos += char_len(rest);
                        state = State::InStringLiteral {
                            delimiter,
                            escape_active: false,
                        };
                        continue;
                    }

                    if let Some(escape) = literal.escape.as_deref() {
                        if rest.starts_with(escape) {
                            pos += escape.len();
                            state = State::InStringLiteral {
                                delimiter,
                                escape_active: true,
                            };
                            continue;
                        }
                    }

                    if rest.starts_with(literal.close.as_str()) {
                        pos += literal.close.len();
                        push(
                            &mut scan,
                            source,
                            SpanKind::StringLiteral {
                                delimiter,
                                terminated: true,
                            },
                            span_start..pos,
                        );
                        span_start = pos;
                        state = State::InCode;
                        continue;
                    }

                    if !literal.multiline && line_content_len(rest) == 0 {
                        recover(&mut scan, source, Construct::StringLiteral, span_start);
                        push(
                            &mut scan,
                            source,
                            SpanKind::StringLiteral {
                                delimiter,
                                terminated: false,
                            },
                            span_start..pos,
                        );
                        span_start = pos;
                        state = State::InCode;
                        continue;
                    }

                    pos += char_len(rest);
                }
            }
        }

        // Whatever is still open runs to end of file.
        let end = source.len();
        match state {
            State::InCode => push(&mut scan, source, SpanKind::Code, span_start..end),
            State::InLineComment { marker } => {
                push(&mut scan, source, SpanKind::LineComment { marker }, span_start..end);
            }
            State::InBlockComment { style } => {
                recover(&mut scan, source, Construct::BlockComment, span_start);
                push(
                    &mut scan,
                    source,
                    SpanKind::BlockComment {
                        style,
                        terminated: false,
                    },
                    span_start..end,
                );
            }
            State::InStringLiteral { delimiter, .. } => {
                recover(&mut scan, source, Construct::StringLiteral, span_start);
                push(
                    &mut scan,
                    source,
                    SpanKind::StringLiteral {
                        delimiter,
                        terminated: false,
                    },
                    span_start..end,
                );
            }
        }

        log::debug!(
            "scanned {} bytes of {} into {} spans",
            source.len(),
            self.grammar.id(),
            scan.spans.len()
        );

        scan
    }
}

fn push<'a>(scan: &mut Scan<'a>, source: &'a str, kind: SpanKind, range: std::ops::Range<usize>) {
    if !range.is_empty() {
        scan.spans.push(Span::new(kind, source, range));
    }
}

fn recover(scan: &mut Scan<'_>, source: &str, construct: Construct, offset: usize) {
    let diagnostic = Diagnostic::unterminated(construct, source, offset);
    log::warn!("{diagnostic}; closed implicitly");
    scan.diagnostics.push(diagnostic);
}

fn char_len(rest: &str) -> usize {
    rest.chars().next().map_or(1, char::len_utf8)
}

/// Length of `rest` up to, but excluding, the next line break (`\n` or `\r\n`)
fn line_content_len(rest: &str) -> usize {
    match rest.find('\n') {
        Some(newline) if rest[..newline].ends_with('\r') => newline - 1,
        Some(newline) => newline,
        None => rest.len(),
    }
}
