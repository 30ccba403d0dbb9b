use crate::models::segment::Segment;
use serde::Serialize;
use std::fmt;

/// Construct that can be left open at the end of its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    BlockComment,
    StringLiteral,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::BlockComment => write!(f, "block comment"),
            Construct::StringLiteral => write!(f, "string literal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The construct was closed implicitly at end of file (or end of line
    /// for single-line string literals)
    UnterminatedConstruct(Construct),
}

/// Non-fatal problem found while segmenting a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte offset where the construct was opened
    pub offset: usize,
    /// 1-based line of `offset`
    pub line: usize,
    /// 1-based column (in characters) of `offset`
    pub column: usize,
}

impl Diagnostic {
    pub fn unterminated(construct: Construct, source: &str, offset: usize) -> Self {
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count() + 1;

        Self {
            kind: DiagnosticKind::UnterminatedConstruct(construct),
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::UnterminatedConstruct(construct) => write!(
                f,
                "{}:{}: unterminated {construct}",
                self.line, self.column
            ),
        }
    }
}

/// Ordered segments of one source file plus the diagnostics raised while
/// building them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    language: String,
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn new(
        language: impl Into<String>,
        segments: Vec<Segment>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            language: language.into(),
            segments,
            diagnostics,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// All code segments concatenated in order
    pub fn code_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.is_code())
            .map(Segment::text)
            .collect()
    }

    pub fn documentation(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.is_documentation())
            .map(Segment::text)
            .collect()
    }

    pub fn count_documentation(&self) -> usize {
        self.segments.iter().filter(|s| s.is_documentation()).count()
    }

    pub fn count_code(&self) -> usize {
        self.segments.iter().filter(|s| s.is_code()).count()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_position() {
        let source = "int x;\n  /* open";
        let diagnostic = Diagnostic::unterminated(Construct::BlockComment, source, 9);
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.column, 3);
        assert_eq!(diagnostic.to_string(), "2:3: unterminated block comment");
    }

    #[test]
    fn test_code_text_skips_documentation() {
        let document = Document::new(
            "c",
            vec![
                Segment::code("int a;\n", "c", 0..7),
                Segment::documentation("doc", 7..17),
                Segment::code("\nint b;", "c", 17..24),
            ],
            Vec::new(),
        );
        assert_eq!(document.code_text(), "int a;\n\nint b;");
        assert_eq!(document.documentation(), vec!["doc"]);
        assert_eq!(document.count_code(), 2);
        assert_eq!((&document).into_iter().count(), 3);
    }
}
