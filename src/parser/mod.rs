//! Syntax tree building and generic tree queries.

pub mod language;
pub mod query;
pub mod tree;
pub mod visit;

pub use language::SupportedLanguage;
pub use tree::{ParserProfile, SyntaxTree};
pub use visit::Visitor;
