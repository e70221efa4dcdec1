//! Syntax tree construction with error recovery.

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use super::language::SupportedLanguage;
use crate::error::{Result, RouteLensError};
use crate::route::ParseError;

/// Default upper bound on the size of a single source file.
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 2 * 1024 * 1024;

/// Fixed grammar profile used to build trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserProfile {
    /// Force a grammar instead of picking one from the file extension.
    pub language: Option<SupportedLanguage>,
    /// Files larger than this are rejected as a parse failure.
    pub max_source_bytes: usize,
}

impl Default for ParserProfile {
    fn default() -> Self {
        Self {
            language: None,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl ParserProfile {
    pub fn language_for(&self, path: &Path) -> SupportedLanguage {
        self.language
            .unwrap_or_else(|| SupportedLanguage::for_path(path))
    }
}

/// A parsed file together with the text it was parsed from.
pub struct SyntaxTree<'s> {
    tree: Tree,
    source: &'s str,
    language: SupportedLanguage,
}

impl<'s> SyntaxTree<'s> {
    /// Parse `source` with the grammar the profile selects for `path`.
    ///
    /// Malformed input still yields a (partial) tree; only a parser that
    /// produces nothing at all is reported as [`RouteLensError::ParseFailure`].
    pub fn parse(source: &'s str, path: &Path, profile: &ParserProfile) -> Result<Self> {
        if source.len() > profile.max_source_bytes {
            return Err(RouteLensError::parse_failure(
                path,
                format!(
                    "file is {} bytes, limit is {}",
                    source.len(),
                    profile.max_source_bytes
                ),
            ));
        }

        let language = profile.language_for(path);
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| RouteLensError::parse_failure(path, e.to_string()))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| RouteLensError::parse_failure(path, "parser produced no tree"))?;

        Ok(Self {
            tree,
            source,
            language,
        })
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &'s [u8] {
        self.source.as_bytes()
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Regions the parser had to recover from, in document order.
    pub fn syntax_errors(&self) -> Vec<ParseError> {
        let root = self.root();
        if !root.has_error() {
            return Vec::new();
        }

        let mut errors = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() {
                let (line, column) = position(&node, self.source());
                errors.push(ParseError::new(
                    format!("unexpected syntax near `{}`", snippet(&node, self.source())),
                    line,
                    column,
                ));
                continue;
            }
            if node.is_missing() {
                let (line, column) = position(&node, self.source());
                errors.push(ParseError::new(
                    format!("missing `{}`", node.kind()),
                    line,
                    column,
                ));
                continue;
            }
            if !node.has_error() {
                continue;
            }
            // Reverse so the stack pops children in source order.
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
        errors
    }
}

/// 1-based line, 0-based column of a node's start.
///
/// tree-sitter columns count bytes; the column returned here counts
/// characters from the start of the line.
pub fn position(node: &Node, source: &[u8]) -> (usize, usize) {
    let point = node.start_position();
    let start = node.start_byte();
    let line_start = start.saturating_sub(point.column);
    let column = source
        .get(line_start..start)
        .and_then(|prefix| std::str::from_utf8(prefix).ok())
        .map_or(point.column, |prefix| prefix.chars().count());
    (point.row + 1, column)
}

/// First line of a node's text, capped at a few dozen characters.
fn snippet(node: &Node, source: &[u8]) -> String {
    let text = node.utf8_text(source).unwrap_or("");
    let first_line = text.lines().next().unwrap_or("").trim();
    first_line.chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_valid_source() {
        let src = "const x = a?.b ?? [...rest];\nasync function f() { await g(); }\n";
        let tree = SyntaxTree::parse(src, &PathBuf::from("a.js"), &ParserProfile::default())
            .unwrap();
        assert_eq!(tree.root().kind(), "program");
        assert_eq!(tree.language(), SupportedLanguage::JavaScript);
        assert!(tree.syntax_errors().is_empty());
    }

    #[test]
    fn test_parse_decorators_in_typescript() {
        let src = "@Controller('cats')\nexport class CatsController {\n  @Get()\n  findAll(): string[] { return []; }\n}\n";
        let tree = SyntaxTree::parse(
            src,
            &PathBuf::from("cats.controller.ts"),
            &ParserProfile::default(),
        )
        .unwrap();
        assert!(tree.syntax_errors().is_empty());
    }

    #[test]
    fn test_malformed_source_recovers() {
        let src = "router.get('/ok', handler);\nfunction (( {\n";
        let tree = SyntaxTree::parse(src, &PathBuf::from("bad.js"), &ParserProfile::default())
            .unwrap();
        let errors = tree.syntax_errors();
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|e| e.line >= 1));
    }

    #[test]
    fn test_column_counts_characters() {
        let src = "// héllo\nconst é = 1; app.get('/x', h);\n";
        let tree = SyntaxTree::parse(src, &PathBuf::from("a.js"), &ParserProfile::default())
            .unwrap();
        let mut calls = Vec::new();
        crate::parser::Visitor::new()
            .on("call_expression", |node| calls.push(position(&node, tree.source())))
            .walk(tree.root());
        assert_eq!(calls, vec![(2, 13)]);
    }

    #[test]
    fn test_oversized_source_is_a_parse_failure() {
        let profile = ParserProfile {
            language: None,
            max_source_bytes: 8,
        };
        let err = SyntaxTree::parse("const app = express();", &PathBuf::from("a.js"), &profile)
            .err()
            .unwrap();
        assert!(matches!(err, RouteLensError::ParseFailure { .. }));
    }

    #[test]
    fn test_profile_language_override() {
        let profile = ParserProfile {
            language: Some(SupportedLanguage::Tsx),
            ..ParserProfile::default()
        };
        assert_eq!(
            profile.language_for(&PathBuf::from("x.js")),
            SupportedLanguage::Tsx
        );
    }
}
