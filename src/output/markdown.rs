use crate::models::document::Document;
use crate::output::{MarkdownRenderer, SyntaxHighlighter, render_document};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

static BACKTICK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`{3,}").unwrap());

/// Leaves documentation text as written
pub struct PassthroughMarkdown;

impl MarkdownRenderer for PassthroughMarkdown {
    fn render_markdown(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Wraps code in a fenced block tagged with its language, leaving the
/// actual highlighting to whatever renders the markdown
pub struct FencedCode;

impl SyntaxHighlighter for FencedCode {
    fn highlight(&self, code: &str, language: &str) -> Result<String> {
        let code = trim_blank_lines(code);
        let longest = BACKTICK_RUN
            .find_iter(code)
            .map(|m| m.as_str().len())
            .max()
            .unwrap_or(0);
        let fence = "`".repeat(longest.max(2) + 1);
        Ok(format!("{fence}{language}\n{code}\n{fence}"))
    }
}

/// Render a document as a literate markdown file: prose as-is, code in
/// fenced blocks
pub fn to_markdown(document: &Document) -> Result<String> {
    let rendered = render_document(document, &PassthroughMarkdown, &FencedCode)?;
    let mut out = rendered
        .iter()
        .map(|segment| segment.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Drop leading and trailing whitespace-only lines, keeping the indentation
/// of the first and last non-blank lines
fn trim_blank_lines(code: &str) -> &str {
    let start = code
        .char_indices()
        .find(|&(_, c)| !c.is_whitespace())
        .map_or(code.len(), |(i, _)| code[..i].rfind('\n').map_or(0, |nl| nl + 1));
    code[start..].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::segment::Segment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fenced_code_keeps_indentation() {
        let fenced = FencedCode
            .highlight("\n\n    return 0;\n}\n\n", "c")
            .unwrap();
        assert_eq!(fenced, "```c\n    return 0;\n}\n```");
    }

    #[test]
    fn test_fence_outgrows_backticks_in_code() {
        let fenced = FencedCode.highlight("let s = \"````\";", "rust").unwrap();
        assert!(fenced.starts_with("`````rust\n"));
        assert!(fenced.ends_with("\n`````"));
    }

    #[test]
    fn test_to_markdown() {
        let document = Document::new(
            "c",
            vec![
                Segment::documentation("# Title", 0..12),
                Segment::code("\n#include <stdio.h>\n\n", "c", 12..32),
                Segment::documentation("Main.", 32..42),
                Segment::code("\nint main(void) {\n  return 0;\n}\n", "c", 42..74),
            ],
            Vec::new(),
        );

        assert_eq!(
            to_markdown(&document).unwrap(),
            "# Title\n\n```c\n#include <stdio.h>\n```\n\nMain.\n\n```c\nint main(void) {\n  return 0;\n}\n```\n"
        );
    }

    #[test]
    fn test_empty_document_renders_empty() {
        let document = Document::new("c", Vec::new(), Vec::new());
        assert_eq!(to_markdown(&document).unwrap(), "");
    }
}
