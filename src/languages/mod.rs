pub mod grammar;
pub mod registry;

pub use grammar::{BlockStyle, Grammar, LineMarker, Opener, StringDelimiter};
pub use registry::LanguageRegistry;
