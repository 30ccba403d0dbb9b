use crate::config::LanguageConfig;
use crate::error::{Result, SegmentError};
use regex::Regex;

/// A line-comment marker and whether it introduces documentation
#[derive(Debug, Clone)]
pub struct LineMarker {
    pub marker: String,
    pub documentation: bool,
}

/// One block-comment style, e.g. `/** ... */`
#[derive(Debug, Clone)]
pub struct BlockStyle {
    pub start: String,
    pub end: String,
    pub documentation: bool,
    continuation: Option<Regex>,
}

impl BlockStyle {
    /// Strip one leading continuation decoration (`  * `) from an interior
    /// comment line. Lines without the decoration are returned unchanged.
    pub fn strip_continuation<'a>(&self, line: &'a str) -> &'a str {
        match &self.continuation {
            Some(re) => match re.find(line) {
                Some(m) => &line[m.end()..],
                None => line,
            },
            None => line,
        }
    }
}

/// String or character literal delimiters
#[derive(Debug, Clone)]
pub struct StringDelimiter {
    pub open: String,
    pub close: String,
    pub escape: Option<String>,
    pub multiline: bool,
}

/// What a marker found in code opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    LineComment(usize),
    BlockComment(usize),
    StringLiteral(usize),
}

/// Compiled, validated comment grammar for one language.
///
/// Built once from configuration and shared read-only (behind an `Arc` in
/// the registry) by every scan.
#[derive(Debug, Clone)]
pub struct Grammar {
    id: String,
    name: String,
    highlight: String,
    extensions: Vec<String>,
    line_markers: Vec<LineMarker>,
    block_styles: Vec<BlockStyle>,
    strings: Vec<StringDelimiter>,
}

impl Grammar {
    /// Validate a language table and compile it.
    pub fn from_config(id: &str, config: &LanguageConfig) -> Result<Self> {
        let invalid = |msg: String| SegmentError::configuration(format!("language '{id}': {msg}"));

        if id.trim().is_empty() {
            return Err(SegmentError::configuration("language with an empty identifier"));
        }
        if config.name.trim().is_empty() {
            return Err(invalid("empty name".to_string()));
        }
        if config.line_comments.is_empty()
            && config.doc_line_comments.is_empty()
            && config.block_comments.is_empty()
        {
            return Err(invalid("no comment markers declared".to_string()));
        }

        // Every marker the scanner can match in code, with its purpose.
        let mut openers: Vec<(&str, &'static str)> = Vec::new();

        let mut line_markers = Vec::new();
        for (marker, documentation) in config
            .line_comments
            .iter()
            .map(|m| (m, false))
            .chain(config.doc_line_comments.iter().map(|m| (m, true)))
        {
            if marker.is_empty() {
                return Err(invalid("empty line-comment marker".to_string()));
            }
            openers.push((marker.as_str(), "line comment"));
            line_markers.push(LineMarker {
                marker: marker.clone(),
                documentation,
            });
        }
        // Longest first so `///` wins over `//`.
        line_markers.sort_by(|a, b| b.marker.len().cmp(&a.marker.len()));

        let mut block_styles: Vec<BlockStyle> = Vec::new();
        for (index, block) in config.block_comments.iter().enumerate() {
            if block.start.is_empty() {
                return Err(invalid(format!("block comment #{} has an empty start", index + 1)));
            }
            let end = match block.end.as_deref() {
                Some(end) if !end.is_empty() => end.to_string(),
                _ => {
                    return Err(invalid(format!(
                        "block comment '{}' is missing its end marker",
                        block.start
                    )));
                }
            };
            if let Some(earlier) = block_styles
                .iter()
                .find(|style| block.start.starts_with(style.start.as_str()))
            {
                return Err(invalid(format!(
                    "block comment '{}' is shadowed by earlier entry '{}'; list the most specific start first",
                    block.start, earlier.start
                )));
            }
            let continuation = match block.continuation.as_deref() {
                Some(marker) if !marker.is_empty() => {
                    let pattern = format!(r"^[ \t]*{}[ \t]?", regex::escape(marker));
                    Some(Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?)
                }
                _ => None,
            };
            openers.push((block.start.as_str(), "block comment"));
            block_styles.push(BlockStyle {
                start: block.start.clone(),
                end,
                documentation: block.documentation,
                continuation,
            });
        }

        let mut strings = Vec::new();
        for delimiter in &config.strings {
            if delimiter.open.is_empty() {
                return Err(invalid("string delimiter with an empty open marker".to_string()));
            }
            let close = match delimiter.close.as_deref() {
                Some(close) if close.is_empty() => {
                    return Err(invalid(format!(
                        "string delimiter '{}' has an empty close marker",
                        delimiter.open
                    )));
                }
                Some(close) => close.to_string(),
                None => delimiter.open.clone(),
            };
            openers.push((delimiter.open.as_str(), "string literal"));
            strings.push(StringDelimiter {
                open: delimiter.open.clone(),
                close,
                escape: delimiter.escape.clone().filter(|e| !e.is_empty()),
                multiline: delimiter.multiline,
            });
        }
        strings.sort_by(|a, b| b.open.len().cmp(&a.open.len()));

        for (i, (marker, purpose)) in openers.iter().enumerate() {
            if let Some((_, other)) = openers[i + 1..].iter().find(|(m, _)| m == marker) {
                return Err(invalid(format!(
                    "marker '{marker}' is declared both as {purpose} and as {other}"
                )));
            }
        }

        Ok(Self {
            id: id.to_lowercase(),
            name: config.name.clone(),
            highlight: config.highlight.clone().unwrap_or_else(|| id.to_lowercase()),
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            line_markers,
            block_styles,
            strings,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language name handed to the syntax highlighter with code segments
    pub fn highlight(&self) -> &str {
        &self.highlight
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn line_marker(&self, index: usize) -> &LineMarker {
        &self.line_markers[index]
    }

    pub fn block_style(&self, index: usize) -> &BlockStyle {
        &self.block_styles[index]
    }

    pub fn string_delimiter(&self, index: usize) -> &StringDelimiter {
        &self.strings[index]
    }

    pub fn line_markers(&self) -> &[LineMarker] {
        &self.line_markers
    }

    pub fn block_styles(&self) -> &[BlockStyle] {
        &self.block_styles
    }

    pub fn string_delimiters(&self) -> &[StringDelimiter] {
        &self.strings
    }

    /// Find the construct opening at the start of `rest`, returning it with
    /// the length of its opening marker. The longest match across all
    /// categories wins.
    pub fn opener_at(&self, rest: &str) -> Option<(Opener, usize)> {
        let mut best: Option<(Opener, usize)> = None;
        let mut offer = |opener: Opener, len: usize| {
            if best.is_none_or(|(_, current)| len > current) {
                best = Some((opener, len));
            }
        };

        if let Some(index) = self.block_style_at(rest) {
            offer(Opener::BlockComment(index), self.block_styles[index].start.len());
        }
        if let Some(index) = self
            .line_markers
            .iter()
            .position(|m| rest.starts_with(m.marker.as_str()))
        {
            offer(Opener::LineComment(index), self.line_markers[index].marker.len());
        }
        if let Some(index) = self
            .strings
            .iter()
            .position(|s| rest.starts_with(s.open.as_str()))
        {
            offer(Opener::StringLiteral(index), self.strings[index].open.len());
        }

        best
    }

    /// First block style in priority order whose start matches. A style is
    /// passed over when a shorter matching style closes inside its opener,
    /// so `/**/` is an empty plain comment rather than an open doc comment.
    fn block_style_at(&self, rest: &str) -> Option<usize> {
        let first = self
            .block_styles
            .iter()
            .position(|style| rest.starts_with(style.start.as_str()))?;
        let opener_len = self.block_styles[first].start.len();

        let overlapped = self.block_styles[first + 1..]
            .iter()
            .position(|style| {
                let len = style.start.len();
                len < opener_len
                    && rest.starts_with(style.start.as_str())
                    && rest[len..].starts_with(style.end.as_str())
            })
            .map(|offset| first + 1 + offset);

        Some(overlapped.unwrap_or(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockCommentConfig, LanguageConfig, StringConfig};

    fn c_config() -> LanguageConfig {
        LanguageConfig::new("C")
            .with_extensions(&["c", "h"])
            .with_line_comment("//")
            .with_block_comment(BlockCommentConfig::documentation("/**", "*/").continuation("*"))
            .with_block_comment(BlockCommentConfig::plain("/*", "*/").continuation("*"))
            .with_string(StringConfig::new("\"").escape("\\"))
    }

    #[test]
    fn test_compiles_c_grammar() {
        let grammar = Grammar::from_config("c", &c_config()).unwrap();
        assert_eq!(grammar.id(), "c");
        assert_eq!(grammar.highlight(), "c");
        assert_eq!(grammar.block_styles().len(), 2);
        assert!(grammar.block_style(0).documentation);
        assert!(!grammar.block_style(1).documentation);
        assert_eq!(grammar.string_delimiter(0).close, "\"");
    }

    #[test]
    fn test_opener_prefers_documentation_block() {
        let grammar = Grammar::from_config("c", &c_config()).unwrap();
        assert_eq!(grammar.opener_at("/** doc */"), Some((Opener::BlockComment(0), 3)));
        assert_eq!(grammar.opener_at("/* plain */"), Some((Opener::BlockComment(1), 2)));
        assert_eq!(grammar.opener_at("// line"), Some((Opener::LineComment(0), 2)));
        assert_eq!(grammar.opener_at("\"str\""), Some((Opener::StringLiteral(0), 1)));
        assert_eq!(grammar.opener_at("int x;"), None);
    }

    #[test]
    fn test_empty_plain_comment_is_not_documentation() {
        let grammar = Grammar::from_config("c", &c_config()).unwrap();
        assert_eq!(grammar.opener_at("/**/ int x;"), Some((Opener::BlockComment(1), 2)));
        assert_eq!(grammar.opener_at("/***/"), Some((Opener::BlockComment(0), 3)));
    }

    #[test]
    fn test_line_markers_longest_first() {
        let config = LanguageConfig::new("Rust")
            .with_line_comment("//")
            .with_doc_line_comment("///");
        let grammar = Grammar::from_config("rust", &config).unwrap();
        assert_eq!(grammar.line_markers()[0].marker, "///");
        let (opener, len) = grammar.opener_at("/// docs").unwrap();
        assert_eq!(len, 3);
        let Opener::LineComment(index) = opener else {
            panic!("expected a line comment, got {opener:?}");
        };
        assert!(grammar.line_marker(index).documentation);
    }

    #[test]
    fn test_missing_end_marker_is_configuration_error() {
        let mut config = c_config();
        config.block_comments[1].end = None;
        let err = Grammar::from_config("c", &config).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("missing its end marker"));
    }

    #[test]
    fn test_shadowed_block_style_is_rejected() {
        let config = LanguageConfig::new("C")
            .with_block_comment(BlockCommentConfig::plain("/*", "*/"))
            .with_block_comment(BlockCommentConfig::documentation("/**", "*/"));
        let err = Grammar::from_config("c", &config).unwrap_err();
        assert!(err.to_string().contains("shadowed"));
    }

    #[test]
    fn test_marker_with_two_purposes_is_rejected() {
        let config = LanguageConfig::new("Odd")
            .with_line_comment("#")
            .with_string(StringConfig::new("#"));
        let err = Grammar::from_config("odd", &config).unwrap_err();
        assert!(err.to_string().contains("'#'"));
    }

    #[test]
    fn test_language_without_comments_is_rejected() {
        let config = LanguageConfig::new("Plain").with_string(StringConfig::new("\""));
        assert!(Grammar::from_config("plain", &config).is_err());
    }

    #[test]
    fn test_continuation_strip_is_best_effort() {
        let grammar = Grammar::from_config("c", &c_config()).unwrap();
        let style = grammar.block_style(0);
        assert_eq!(style.strip_continuation("  * item"), "item");
        assert_eq!(style.strip_continuation("  *"), "");
        assert_eq!(style.strip_continuation(" *   indented"), "  indented");
        assert_eq!(style.strip_continuation("   no marker"), "   no marker");
    }
}
