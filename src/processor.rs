use crate::error::Result;
use crate::languages::grammar::Grammar;
use crate::languages::registry::LanguageRegistry;
use crate::models::document::Document;
use crate::processing::segment_source;
use anyhow::Context;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of segmenting one file
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub document: Document,
}

/// Outcome for one file of a batch; failures stay attached to their path
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: anyhow::Result<ProcessedFile>,
}

/// Segments sources with grammars from a shared, immutable registry.
///
/// Cloning is cheap and every call is independent, so one processor can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct Processor {
    registry: Arc<LanguageRegistry>,
}

impl Processor {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self::with_registry(Arc::new(registry))
    }

    pub fn with_registry(registry: Arc<LanguageRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Segment in-memory source text. Unknown language ids are a
    /// configuration error and produce no document.
    pub fn segment(&self, source: &str, language: &str) -> Result<Document> {
        let grammar = self.registry.grammar(language)?;
        Ok(segment_source(source, &grammar))
    }

    /// Segment with an explicit grammar, bypassing the registry
    pub fn segment_with_grammar(&self, source: &str, grammar: &Grammar) -> Document {
        segment_source(source, grammar)
    }

    /// Read and segment a single file. The language is taken from
    /// `language` when given, otherwise detected from the file extension.
    pub fn process_file(
        &self,
        path: &Path,
        language: Option<&str>,
    ) -> anyhow::Result<ProcessedFile> {
        let grammar = match language {
            Some(id) => self.registry.grammar(id)?,
            None => self
                .registry
                .detect_language_arc(path)
                .with_context(|| format!("Unsupported file type: {}", path.display()))?,
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let document = segment_source(&content, &grammar);
        for diagnostic in document.diagnostics() {
            log::warn!("{}:{diagnostic}", path.display());
        }

        Ok(ProcessedFile {
            path: path.to_path_buf(),
            document,
        })
    }

    /// Segment many files in parallel. Each file succeeds or fails on its
    /// own; results come back in input order.
    pub fn process_files(&self, paths: &[PathBuf], language: Option<&str>) -> Vec<FileOutcome> {
        paths
            .par_iter()
            .map(|path| FileOutcome {
                path: path.clone(),
                result: self.process_file(path, language),
            })
            .collect()
    }
}
