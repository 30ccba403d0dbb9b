use crate::config::Config;
use crate::error::{Result, SegmentError};
use crate::languages::grammar::Grammar;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Immutable lookup of compiled grammars by language id and file extension
#[derive(Debug, Default, Clone)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<Grammar>>,
    extension_map: HashMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every language table in the configuration. The first
    /// invalid table aborts with a configuration error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();

        // Sorted so the reported error is deterministic.
        let mut ids: Vec<&String> = config.languages.keys().collect();
        ids.sort();

        for id in ids {
            let grammar = Grammar::from_config(id, &config.languages[id])?;
            registry.register_language(grammar);
        }

        Ok(registry)
    }

    pub fn register_language(&mut self, grammar: Grammar) {
        let grammar = Arc::new(grammar);
        let name_lower = grammar.id().to_string();

        for extension in grammar.extensions() {
            self.extension_map
                .insert(extension.clone(), name_lower.clone());
        }

        self.languages.insert(name_lower, grammar);
    }

    pub fn get_language(&self, name: &str) -> Option<&Grammar> {
        self.languages.get(&name.to_lowercase()).map(Arc::as_ref)
    }

    /// Shared handle to a grammar, failing for unknown identifiers
    pub fn grammar(&self, name: &str) -> Result<Arc<Grammar>> {
        self.languages
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| SegmentError::unknown_language(name))
    }

    pub fn detect_language(&self, file_path: &Path) -> Option<&Grammar> {
        let language_name = self.detect_language_name(file_path)?;
        self.languages.get(language_name).map(Arc::as_ref)
    }

    #[must_use]
    pub fn detect_language_arc(&self, file_path: &Path) -> Option<Arc<Grammar>> {
        let language_name = self.detect_language_name(file_path)?;
        self.languages.get(language_name).cloned()
    }

    fn detect_language_name(&self, file_path: &Path) -> Option<&str> {
        let extension = file_path.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&extension).map(String::as_str)
    }

    /// Language ids in alphabetical order
    pub fn get_supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.languages.keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn is_supported_extension(&self, extension: &str) -> bool {
        let normalized_ext = extension.trim_start_matches('.').to_lowercase();
        self.extension_map.contains_key(&normalized_ext)
    }

    pub fn is_supported_language(&self, name: &str) -> bool {
        self.languages.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockCommentConfig, LanguageConfig};
    use std::path::PathBuf;

    fn registry() -> LanguageRegistry {
        let mut config = Config::default();
        config.languages.insert(
            "c".to_string(),
            LanguageConfig::new("C")
                .with_extensions(&["c", ".h"])
                .with_line_comment("//")
                .with_block_comment(BlockCommentConfig::documentation("/**", "*/"))
                .with_block_comment(BlockCommentConfig::plain("/*", "*/")),
        );
        config.languages.insert(
            "Shell".to_string(),
            LanguageConfig::new("Shell")
                .with_extensions(&["sh"])
                .with_line_comment("#"),
        );
        LanguageRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn test_detect_language_by_extension() {
        let registry = registry();
        assert_eq!(registry.detect_language(&PathBuf::from("src/main.c")).unwrap().id(), "c");
        assert_eq!(registry.detect_language(&PathBuf::from("include/x.H")).unwrap().id(), "c");
        assert!(registry.detect_language(&PathBuf::from("notes.txt")).is_none());
        assert!(registry.detect_language(&PathBuf::from("Makefile")).is_none());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = registry();
        assert!(registry.is_supported_language("shell"));
        assert!(registry.is_supported_language("SHELL"));
        assert!(registry.is_supported_extension(".sh"));
        assert_eq!(registry.get_supported_languages(), vec!["c", "shell"]);
    }

    #[test]
    fn test_unknown_language_is_error() {
        let registry = registry();
        let err = registry.grammar("cobol").unwrap_err();
        assert!(matches!(err, SegmentError::UnknownLanguage(ref name) if name == "cobol"));
        assert!(err.is_configuration());
    }
}
