// Literate - split source files into documentation and code segments
// Re-export public modules and types

pub mod cli;
pub mod config;
pub mod error;
pub mod languages;
pub mod models;
pub mod output;
pub mod processing;
pub mod processor;
pub mod utils;

// Re-export main types for convenience
pub use config::Config;
pub use error::{Result, SegmentError};
pub use languages::{Grammar, LanguageRegistry};
pub use models::{Diagnostic, Document, Segment};
pub use processing::segment_source;
pub use processor::Processor;
pub use utils::path::expand_paths;
