//! Route data model and path handling.

pub mod path;
pub mod types;

pub use path::{combine_paths, normalize_path, tokenize_params};
pub use types::{
    Framework, HttpMethod, ParamKind, ParseError, ParseOutcome, RouteDescriptor, RouteParam,
    SourceLocation,
};
