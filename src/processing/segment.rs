use crate::languages::grammar::Grammar;
use crate::models::segment::Segment;
use crate::models::span::Span;
use crate::processing::comment::{CommentNormalizer, NormalizedComment};

/// Assembles scanner spans into the ordered segments of a document.
///
/// Documentation comments become `Documentation` segments; everything else,
/// incidental comments included, is copied verbatim into `Code` segments.
/// Segment ranges tile the source without gaps.
pub struct SegmentBuilder<'g> {
    grammar: &'g Grammar,
    normalizer: CommentNormalizer<'g>,
}

impl<'g> SegmentBuilder<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            normalizer: CommentNormalizer::new(grammar),
        }
    }

    pub fn build(&self, source: &str, spans: &[Span<'_>]) -> Vec<Segment> {
        if source.trim().is_empty() {
            return Vec::new();
        }

        let mut segments = Vec::new();
        let mut cursor = 0;

        for comment in self.documentation_runs(source, spans) {
            if cursor < comment.range.start {
                segments.push(self.code(source, cursor..comment.range.start));
            }
            cursor = comment.range.end;
            segments.push(Segment::documentation(comment.text, comment.range));
        }

        if cursor < source.len() {
            segments.push(self.code(source, cursor..source.len()));
        }

        segments
    }

    /// Group documentation comments into runs and normalize each run.
    /// Comments join a run when only whitespace with at most one line break
    /// separates them; a blank line or any other text ends the run.
    fn documentation_runs(&self, source: &str, spans: &[Span<'_>]) -> Vec<NormalizedComment> {
        let mut runs: Vec<Vec<&Span<'_>>> = Vec::new();

        for span in spans
            .iter()
            .filter(|s| self.normalizer.is_documentation(s) == Some(true))
        {
            let joins = runs.last().and_then(|run| run.last()).is_some_and(|previous| {
                let gap = &source[previous.end()..span.start()];
                gap.trim().is_empty() && gap.matches('\n').count() <= 1
            });

            match runs.last_mut() {
                Some(run) if joins => run.push(span),
                _ => runs.push(vec![span]),
            }
        }

        runs.iter()
            .filter_map(|run| self.normalizer.normalize(source, run))
            .collect()
    }

    fn code(&self, source: &str, range: std::ops::Range<usize>) -> Segment {
        Segment::code(&source[range.clone()], self.grammar.highlight(), range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockCommentConfig, LanguageConfig, StringConfig};
    use crate::processing::scanner::Scanner;
    use pretty_assertions::assert_eq;

    fn grammar() -> Grammar {
        let config = LanguageConfig::new("C")
            .with_line_comment("//")
            .with_doc_line_comment("///")
            .with_block_comment(BlockCommentConfig::documentation("/**", "*/").continuation("*"))
            .with_block_comment(BlockCommentConfig::plain("/*", "*/").continuation("*"))
            .with_string(StringConfig::new("\"").escape("\\").single_line());
        Grammar::from_config("c", &config).unwrap()
    }

    fn build(source: &str) -> Vec<Segment> {
        let grammar = grammar();
        let scan = Scanner::new(&grammar).scan(source);
        SegmentBuilder::new(&grammar).build(source, &scan.spans)
    }

    #[test]
    fn test_documentation_then_code() {
        let segments = build("/** Hello */\nint main(void){return 0;}");
        assert_eq!(
            segments,
            vec![
                Segment::documentation("Hello", 0..12),
                Segment::code("\nint main(void){return 0;}", "c", 12..38),
            ]
        );
    }

    #[test]
    fn test_incidental_line_comment_stays_in_code() {
        let source = "int x = 10; // not documentation";
        let segments = build(source);
        assert_eq!(segments, vec![Segment::code(source, "c", 0..source.len())]);
    }

    #[test]
    fn test_empty_and_whitespace_inputs() {
        assert!(build("").is_empty());
        assert!(build("  \n\t\n").is_empty());
    }

    #[test]
    fn test_adjacent_documentation_merges() {
        let source = "/// one\n/// two\n/** three */\nint x;";
        let segments = build(source);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text(), "one\ntwo\nthree");
        assert_eq!(segments[1].text(), "\nint x;");
    }

    #[test]
    fn test_blank_line_separates_documentation() {
        let source = "/** one */\n\n/** two */\nint x;";
        let segments = build(source);
        assert_eq!(
            segments,
            vec![
                Segment::documentation("one", 0..10),
                Segment::code("\n\n", "c", 10..12),
                Segment::documentation("two", 12..22),
                Segment::code("\nint x;", "c", 22..29),
            ]
        );
        assert!(segments[1].is_blank());
    }

    #[test]
    fn test_incidental_comment_breaks_documentation_run() {
        let source = "/** one */\n/* plain */\n/** two */";
        let segments = build(source);
        let texts: Vec<&str> = segments.iter().map(Segment::text).collect();
        assert_eq!(texts, vec!["one", "\n/* plain */\n", "two"]);
    }

    #[test]
    fn test_indentation_before_documentation_is_absorbed() {
        let source = "int main(void) {\n    /** Say hi */\n    puts(\"hi\");\n}\n";
        let segments = build(source);
        assert_eq!(segments[0].text(), "int main(void) {\n");
        assert_eq!(segments[1], Segment::documentation("Say hi", 17..34));
        assert_eq!(segments[2].text(), "\n    puts(\"hi\");\n}\n");
    }

    #[test]
    fn test_ranges_tile_the_source() {
        let source = "/**\n * Intro\n */\n#include <stdio.h>\n\nint main(void) {\n  /** Print */\n  printf(\"/** not doc */\\n\");\n  return 0; /* done */\n}\n/** end";
        let segments = build(source);

        let mut cursor = 0;
        for segment in &segments {
            assert_eq!(segment.range().start, cursor);
            assert!(segment.range().end > cursor);
            cursor = segment.range().end;
            if segment.is_code() {
                assert_eq!(segment.text(), &source[segment.range()]);
            }
        }
        assert_eq!(cursor, source.len());
        assert_eq!(segments.last().unwrap().text(), "end");
    }
}
