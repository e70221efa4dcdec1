//! # routelens
//!
//! Static HTTP route discovery for JavaScript and TypeScript backends.
//!
//! routelens parses source files with tree-sitter and reports every route
//! it can resolve from two idioms:
//!
//! - **Imperative** (Express): `router.get('/items/:id', auth, getItem)`
//! - **Decorator** (NestJS): `@Controller('cats')` classes with `@Get(':id')` methods
//!
//! Nothing is executed and no imports are followed. Each file is handled on
//! its own, and syntax errors are reported next to whatever routes could
//! still be recovered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let source = "const router = express.Router();\nrouter.get('/items/:id', getItem);";
//! let outcome = routelens::dispatch(source, Path::new("routes/items.js"));
//!
//! for route in &outcome.routes {
//!     println!("{} {} -> {}", route.method, route.path, route.handler);
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod parser;
pub mod route;
pub mod scan;

// Re-exports for convenience
pub use config::RouteLensConfig;
pub use error::{Result, RouteLensError};
pub use extract::{Dispatcher, ExpressExtractor, NestJsExtractor, RouteExtractor};
pub use parser::{ParserProfile, SupportedLanguage, SyntaxTree};
pub use route::{
    Framework, HttpMethod, ParamKind, ParseError, ParseOutcome, RouteDescriptor, RouteParam,
    SourceLocation,
};
pub use scan::{scan_project, ScanReport};

use std::path::Path;

/// Extract routes from one file using the built-in extractors.
pub fn dispatch(text: &str, path: &Path) -> ParseOutcome {
    Dispatcher::default().dispatch(text, path)
}
