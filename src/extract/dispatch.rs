//! Dispatch facade: classify, parse once, run every accepted extractor.

use std::path::Path;

use tracing::{debug, warn};

use super::{failure_to_error, ExpressExtractor, NestJsExtractor, RouteExtractor};
use crate::parser::{ParserProfile, SyntaxTree};
use crate::route::{Framework, ParseOutcome};

/// Registry of extractors sharing one grammar profile.
///
/// Holds no per-call state, so a single instance can serve many threads.
pub struct Dispatcher {
    extractors: Vec<Box<dyn RouteExtractor>>,
    profile: ParserProfile,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ParserProfile::default())
            .with_extractor(ExpressExtractor::new())
            .with_extractor(NestJsExtractor::new())
    }
}

impl Dispatcher {
    /// An empty registry.
    pub fn new(profile: ParserProfile) -> Self {
        Self {
            extractors: Vec::new(),
            profile,
        }
    }

    pub fn with_extractor(mut self, extractor: impl RouteExtractor + 'static) -> Self {
        self.register(Box::new(extractor));
        self
    }

    pub fn register(&mut self, extractor: Box<dyn RouteExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn frameworks(&self) -> Vec<Framework> {
        self.extractors.iter().map(|e| e.framework()).collect()
    }

    /// Extract every route from one file.
    ///
    /// Never fails: a file whose tree cannot be built yields a single
    /// error and no routes. Recovered syntax errors are reported alongside
    /// whatever routes were found.
    pub fn dispatch(&self, text: &str, path: &Path) -> ParseOutcome {
        let accepted: Vec<&dyn RouteExtractor> = self
            .extractors
            .iter()
            .map(|e| e.as_ref())
            .filter(|e| e.classify(text, path))
            .collect();

        let Some(first) = accepted.first() else {
            debug!(file = %path.display(), "no extractor accepted file");
            return ParseOutcome::new(Framework::Unknown);
        };

        let tree = match SyntaxTree::parse(text, path, &self.profile) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to build syntax tree");
                return ParseOutcome::failed(first.framework(), failure_to_error(&e));
            }
        };

        let mut outcome = ParseOutcome::new(first.framework());
        outcome.errors = tree.syntax_errors();
        if outcome.has_errors() {
            debug!(
                file = %path.display(),
                errors = outcome.errors.len(),
                "recovered from syntax errors"
            );
        }

        let mut producing = None;
        for extractor in &accepted {
            let routes = extractor.extract_tree(&tree, path);
            if producing.is_none() && !routes.is_empty() {
                producing = Some(extractor.framework());
            }
            outcome.routes.extend(routes);
        }
        if let Some(framework) = producing {
            outcome.framework = framework;
        }

        debug!(
            file = %path.display(),
            language = tree.language().name(),
            routes = outcome.routes.len(),
            framework = %outcome.framework,
            "extracted routes"
        );
        outcome
    }
}
