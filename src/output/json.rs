use crate::models::document::Document;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    document: &'a Document,
}

/// Serialize a document, tagged with the file it came from
pub fn to_json(path: &Path, document: &Document, pretty: bool) -> Result<String> {
    let report = FileReport { path, document };
    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    json.with_context(|| format!("Failed to serialize {}", path.display()))
}
