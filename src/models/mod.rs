pub mod document;
pub mod segment;
pub mod span;

pub use document::{Construct, Diagnostic, DiagnosticKind, Document};
pub use segment::Segment;
pub use span::{Span, SpanKind};
