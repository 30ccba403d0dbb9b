use serde::Serialize;
use std::ops::Range;

/// A unit of the literate document: prose or verbatim code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Comment text with delimiters and decoration stripped
    Documentation { text: String, range: Range<usize> },
    /// Source text copied verbatim, including incidental comments
    Code {
        text: String,
        language: String,
        range: Range<usize>,
    },
}

impl Segment {
    pub fn documentation(text: impl Into<String>, range: Range<usize>) -> Self {
        Segment::Documentation {
            text: text.into(),
            range,
        }
    }

    pub fn code(text: impl Into<String>, language: impl Into<String>, range: Range<usize>) -> Self {
        Segment::Code {
            text: text.into(),
            language: language.into(),
            range,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Segment::Documentation { text, .. } | Segment::Code { text, .. } => text,
        }
    }

    /// Byte range of the source this segment was built from
    pub fn range(&self) -> Range<usize> {
        match self {
            Segment::Documentation { range, .. } | Segment::Code { range, .. } => range.clone(),
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Segment::Code { language, .. } => Some(language),
            Segment::Documentation { .. } => None,
        }
    }

    pub fn is_documentation(&self) -> bool {
        matches!(self, Segment::Documentation { .. })
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }

    /// Whitespace-only code between or after documentation
    pub fn is_blank(&self) -> bool {
        self.is_code() && self.text().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let doc = Segment::documentation("Hello", 0..12);
        assert!(doc.is_documentation());
        assert_eq!(doc.text(), "Hello");
        assert_eq!(doc.language(), None);

        let code = Segment::code("\n  \n", "c", 12..16);
        assert!(code.is_code());
        assert!(code.is_blank());
        assert_eq!(code.language(), Some("c"));
        assert_eq!(code.range(), 12..16);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(Segment::code("int x;", "c", 0..6)).unwrap();
        assert_eq!(json["kind"], "code");
        assert_eq!(json["language"], "c");
        assert_eq!(json["range"]["end"], 6);
    }
}
