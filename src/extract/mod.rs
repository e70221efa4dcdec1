//! Route extractors and the dispatch facade.
//!
//! Each routing idiom is a [`RouteExtractor`]: a cheap text classifier plus
//! a tree-based extraction pass. The [`Dispatcher`] runs every registered
//! extractor whose classifier accepts a file.

pub mod detect;
pub mod dispatch;
pub mod express;
pub mod nestjs;

use std::path::Path;

use crate::error::RouteLensError;
use crate::parser::{ParserProfile, SyntaxTree};
use crate::route::{Framework, ParseError, ParseOutcome, RouteDescriptor};

pub use dispatch::Dispatcher;
pub use express::ExpressExtractor;
pub use nestjs::NestJsExtractor;

/// One routing idiom.
pub trait RouteExtractor: Send + Sync {
    /// The framework tag stamped on routes this extractor produces.
    fn framework(&self) -> Framework;

    /// Cheap, parse-free eligibility check.
    fn classify(&self, text: &str, path: &Path) -> bool;

    /// Extract routes from an already-parsed file.
    fn extract_tree(&self, tree: &SyntaxTree<'_>, path: &Path) -> Vec<RouteDescriptor>;

    /// Parse `text` and extract routes, collecting recovered syntax errors.
    fn extract(&self, text: &str, path: &Path) -> ParseOutcome {
        self.extract_with(text, path, &ParserProfile::default())
    }

    fn extract_with(&self, text: &str, path: &Path, profile: &ParserProfile) -> ParseOutcome {
        match SyntaxTree::parse(text, path, profile) {
            Ok(tree) => ParseOutcome {
                routes: self.extract_tree(&tree, path),
                framework: self.framework(),
                errors: tree.syntax_errors(),
            },
            Err(e) => ParseOutcome::failed(self.framework(), failure_to_error(&e)),
        }
    }
}

/// Turn a fatal tree-building error into the single error of an outcome.
pub(crate) fn failure_to_error(error: &RouteLensError) -> ParseError {
    let message = match error {
        RouteLensError::ParseFailure { message, .. } => message.clone(),
        other => other.to_string(),
    };
    ParseError::new(message, 1, 0)
}
