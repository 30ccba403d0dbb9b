pub mod comment;
pub mod scanner;
pub mod segment;

use crate::languages::grammar::Grammar;
use crate::models::document::Document;

pub use comment::{CommentNormalizer, NormalizedComment};
pub use scanner::{Scan, Scanner};
pub use segment::SegmentBuilder;

/// Scan, normalize and assemble one source text with a grammar
pub fn segment_source(source: &str, grammar: &Grammar) -> Document {
    let scan = Scanner::new(grammar).scan(source);
    let segments = SegmentBuilder::new(grammar).build(source, &scan.spans);
    Document::new(grammar.id(), segments, scan.diagnostics)
}
