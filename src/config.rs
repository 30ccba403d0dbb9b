use crate::error::{Result, SegmentError};
use crate::languages::registry::LanguageRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File names searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAMES: [&str; 2] = ["literate.toml", ".literaterc.toml"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Comment grammar tables keyed by language identifier
    #[serde(default)]
    pub languages: HashMap<String, LanguageConfig>,
}

/// Comment grammar table for one language
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanguageConfig {
    /// Display name for the language
    pub name: String,

    /// File extensions for this language
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Language name passed to the syntax highlighter (defaults to the id)
    pub highlight: Option<String>,

    /// Plain line-comment markers, e.g. `//`
    #[serde(default)]
    pub line_comments: Vec<String>,

    /// Line-comment markers that introduce documentation, e.g. `///`
    #[serde(default)]
    pub doc_line_comments: Vec<String>,

    /// Block-comment styles in priority order, most specific first
    #[serde(default)]
    pub block_comments: Vec<BlockCommentConfig>,

    /// String and character literal delimiters
    #[serde(default)]
    pub strings: Vec<StringConfig>,
}

/// One block-comment style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockCommentConfig {
    pub start: String,

    /// Kept optional so a missing end marker is reported as a grammar
    /// error instead of a TOML parse failure
    pub end: Option<String>,

    /// Comments in this style become documentation segments
    #[serde(default)]
    pub documentation: bool,

    /// Decoration repeated at the start of interior lines, e.g. `*`
    pub continuation: Option<String>,
}

/// String literal delimiters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StringConfig {
    pub open: String,

    /// Defaults to the open delimiter
    pub close: Option<String>,

    pub escape: Option<String>,

    /// Single-line literals are closed implicitly at the end of their line
    #[serde(default = "default_true")]
    pub multiline: bool,
}

fn default_true() -> bool {
    true
}

impl LanguageConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|&s| s.to_string()).collect();
        self
    }

    pub fn with_highlight(mut self, highlight: &str) -> Self {
        self.highlight = Some(highlight.to_string());
        self
    }

    pub fn with_line_comment(mut self, marker: &str) -> Self {
        self.line_comments.push(marker.to_string());
        self
    }

    pub fn with_doc_line_comment(mut self, marker: &str) -> Self {
        self.doc_line_comments.push(marker.to_string());
        self
    }

    pub fn with_block_comment(mut self, block: BlockCommentConfig) -> Self {
        self.block_comments.push(block);
        self
    }

    pub fn with_string(mut self, string: StringConfig) -> Self {
        self.strings.push(string);
        self
    }
}

impl BlockCommentConfig {
    pub fn plain(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: Some(end.to_string()),
            documentation: false,
            continuation: None,
        }
    }

    pub fn documentation(start: &str, end: &str) -> Self {
        Self {
            documentation: true,
            ..Self::plain(start, end)
        }
    }

    pub fn continuation(mut self, marker: &str) -> Self {
        self.continuation = Some(marker.to_string());
        self
    }
}

impl StringConfig {
    pub fn new(delimiter: &str) -> Self {
        Self {
            open: delimiter.to_string(),
            close: None,
            escape: None,
            multiline: true,
        }
    }

    pub fn close(mut self, close: &str) -> Self {
        self.close = Some(close.to_string());
        self
    }

    pub fn escape(mut self, escape: &str) -> Self {
        self.escape = Some(escape.to_string());
        self
    }

    pub fn single_line(mut self) -> Self {
        self.multiline = false;
        self
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SegmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SegmentError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate().map_err(|e| match e {
            SegmentError::Configuration(msg) => {
                SegmentError::Configuration(format!("{msg} (in {})", path.display()))
            }
            other => other,
        })?;

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| SegmentError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every grammar table by compiling it
    pub fn validate(&self) -> Result<()> {
        LanguageRegistry::from_config(self).map(|_| ())
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge_with(&self, other: &Config) -> Config {
        let mut merged = self.clone();

        for (name, config) in &other.languages {
            merged.languages.insert(name.clone(), config.clone());
        }

        merged
    }

    /// Load and merge every configuration file that applies to `start_dir`:
    /// the global file first, then ancestors from the outermost inwards.
    /// The first file that fails to load aborts discovery with its error.
    /// Returns `None` when nothing was found.
    pub fn discover<P: AsRef<Path>>(start_dir: P) -> Result<Option<(Config, Vec<PathBuf>)>> {
        let mut candidates = Vec::new();

        if let Some(global) = Self::global_config_path() {
            candidates.push(global);
        }

        let mut local: Vec<PathBuf> = start_dir
            .as_ref()
            .ancestors()
            .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
            .collect();
        // Nearest configs override outer ones.
        local.reverse();
        candidates.extend(local);

        let mut merged: Option<Config> = None;
        let mut loaded = Vec::new();

        for path in candidates {
            if !path.is_file() {
                continue;
            }
            let config = Config::from_file(&path)?;
            log::debug!("loaded configuration from {}", path.display());
            merged = Some(match merged {
                Some(base) => base.merge_with(&config),
                None => config,
            });
            loaded.push(path);
        }

        Ok(merged.map(|config| (config, loaded)))
    }

    /// Get the global configuration file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("literate").join("config.toml"))
    }

    /// Grammar tables shipped with the command-line tool, also written by
    /// `literate init`
    pub fn template() -> String {
        r###"# Literate configuration file
#
# Each [languages.<id>] table describes the comment grammar of one language.
# Block comment styles are tried in order: list the most specific start first.
# Only styles marked `documentation = true` (and `doc_line_comments`) become
# documentation; every other comment stays verbatim in the code.

[languages.c]
name = "C"
extensions = ["c", "h"]
line_comments = ["//"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
]

[languages.cpp]
name = "C++"
extensions = ["cpp", "cc", "cxx", "hpp", "hh", "hxx"]
line_comments = ["//"]
doc_line_comments = ["///", "//!"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*!", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
]

[languages.java]
name = "Java"
extensions = ["java"]
line_comments = ["//"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"\"\"", escape = "\\" },
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
]

[languages.javascript]
name = "JavaScript"
extensions = ["js", "mjs", "cjs", "jsx"]
line_comments = ["//"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
    { open = "`", escape = "\\" },
]

[languages.typescript]
name = "TypeScript"
extensions = ["ts", "mts", "cts", "tsx"]
line_comments = ["//"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
    { open = "`", escape = "\\" },
]

[languages.go]
name = "Go"
extensions = ["go"]
line_comments = ["//"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
    { open = "`" },
]

[languages.rust]
name = "Rust"
extensions = ["rs"]
line_comments = ["//"]
doc_line_comments = ["///", "//!"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*!", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
# `'` alone would also open lifetimes, so only quote characters are listed.
strings = [
    { open = "r#\"", close = "\"#" },
    { open = "r\"", close = "\"" },
    { open = "\"", escape = "\\" },
    { open = "'\"", close = "'" },
    { open = "'\\\"", close = "'" },
]

[languages.css]
name = "CSS"
extensions = ["css", "scss", "less"]
block_comments = [
    { start = "/**", end = "*/", documentation = true, continuation = "*" },
    { start = "/*", end = "*/", continuation = "*" },
]
strings = [
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
]

[languages.python]
name = "Python"
extensions = ["py", "pyi"]
line_comments = ["#"]
doc_line_comments = ["##"]
strings = [
    { open = "\"\"\"", escape = "\\" },
    { open = "'''", escape = "\\" },
    { open = "\"", escape = "\\", multiline = false },
    { open = "'", escape = "\\", multiline = false },
]

[languages.shell]
name = "Shell"
extensions = ["sh", "bash", "zsh"]
line_comments = ["#"]
doc_line_comments = ["##"]
# Parameter expansions like `${path##*/}` contain `#`, keep them out of comments.
strings = [
    { open = "${", close = "}", multiline = false },
    { open = "\"", escape = "\\" },
    { open = "'" },
]
"###
        .to_string()
    }
}
