use std::ops::Range;

/// Lexical class of a span, carrying the index of the grammar entry that
/// opened it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Code,
    LineComment { marker: usize },
    BlockComment { style: usize, terminated: bool },
    StringLiteral { delimiter: usize, terminated: bool },
}

/// A classified range of raw source text produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    pub range: Range<usize>,
    pub text: &'a str,
}

impl<'a> Span<'a> {
    pub fn new(kind: SpanKind, source: &'a str, range: Range<usize>) -> Self {
        Self {
            kind,
            text: &source[range.clone()],
            range,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.kind,
            SpanKind::LineComment { .. } | SpanKind::BlockComment { .. }
        )
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}
