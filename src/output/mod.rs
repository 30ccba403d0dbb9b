pub mod json;
pub mod markdown;

use crate::models::document::Document;
use crate::models::segment::Segment;
use anyhow::Result;

/// Renders documentation text. The text has its comment decoration
/// stripped but is not guaranteed to be valid markdown.
pub trait MarkdownRenderer {
    fn render_markdown(&self, text: &str) -> Result<String>;
}

/// Renders code text for a declared language
pub trait SyntaxHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String>;
}

/// One rendered piece of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedSegment {
    Prose(String),
    Code(String),
}

impl RenderedSegment {
    pub fn as_str(&self) -> &str {
        match self {
            RenderedSegment::Prose(text) | RenderedSegment::Code(text) => text,
        }
    }
}

/// Hand every segment to its collaborator in document order. Blank code
/// segments have nothing to show and are skipped.
pub fn render_document<M, H>(
    document: &Document,
    renderer: &M,
    highlighter: &H,
) -> Result<Vec<RenderedSegment>>
where
    M: MarkdownRenderer + ?Sized,
    H: SyntaxHighlighter + ?Sized,
{
    let mut rendered = Vec::with_capacity(document.len());

    for segment in document {
        match segment {
            Segment::Documentation { text, .. } => {
                rendered.push(RenderedSegment::Prose(renderer.render_markdown(text)?));
            }
            Segment::Code { .. } if segment.is_blank() => {}
            Segment::Code { text, language, .. } => {
                rendered.push(RenderedSegment::Code(highlighter.highlight(text, language)?));
            }
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl MarkdownRenderer for Upper {
        fn render_markdown(&self, text: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    struct Tagged;

    impl SyntaxHighlighter for Tagged {
        fn highlight(&self, code: &str, language: &str) -> Result<String> {
            Ok(format!("<{language}>{code}</{language}>"))
        }
    }

    struct Failing;

    impl SyntaxHighlighter for Failing {
        fn highlight(&self, _code: &str, language: &str) -> Result<String> {
            anyhow::bail!("no grammar for {language}")
        }
    }

    fn document() -> Document {
        Document::new(
            "c",
            vec![
                Segment::documentation("intro", 0..9),
                Segment::code("\nint x;\n", "c", 9..17),
                Segment::documentation("outro", 17..26),
                Segment::code("\n", "c", 26..27),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn test_render_in_order_and_skip_blank_code() {
        let rendered = render_document(&document(), &Upper, &Tagged).unwrap();
        assert_eq!(
            rendered,
            vec![
                RenderedSegment::Prose("INTRO".to_string()),
                RenderedSegment::Code("<c>\nint x;\n</c>".to_string()),
                RenderedSegment::Prose("OUTRO".to_string()),
            ]
        );
    }

    #[test]
    fn test_collaborator_errors_propagate() {
        let err = render_document(&document(), &Upper, &Failing).unwrap_err();
        assert!(err.to_string().contains("no grammar for c"));
    }
}
