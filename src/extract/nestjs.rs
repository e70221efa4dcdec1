//! Decorator (NestJS-style) route extraction.
//!
//! A class marked `@Controller(prefix?)` contributes one route per verb
//! decorator (`@Get`, `@Post`, ...) on each of its methods. Classes without
//! the controller marker are never inspected.

use std::path::Path;

use tracing::debug;
use tree_sitter::Node;

use super::detect::looks_like_nestjs;
use super::RouteExtractor;
use crate::parser::query::{literal_value, named_children, node_text, Expr};
use crate::parser::tree::position;
use crate::parser::{SyntaxTree, Visitor};
use crate::route::{
    combine_paths, normalize_path, tokenize_params, Framework, HttpMethod, RouteDescriptor,
    SourceLocation,
};

pub const CONTROLLER_DECORATOR: &str = "Controller";

/// Controller name used when a class has no resolvable name.
pub const ANONYMOUS_CONTROLLER: &str = "anonymous";

const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration", "class"];

#[derive(Debug, Clone, Copy, Default)]
pub struct NestJsExtractor;

impl NestJsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl RouteExtractor for NestJsExtractor {
    fn framework(&self) -> Framework {
        Framework::NestJs
    }

    fn classify(&self, text: &str, _path: &Path) -> bool {
        looks_like_nestjs(text)
    }

    fn extract_tree(&self, tree: &SyntaxTree<'_>, path: &Path) -> Vec<RouteDescriptor> {
        let source = tree.source();
        let mut routes = Vec::new();

        Visitor::new()
            .on_kinds(CLASS_KINDS, |class| {
                // `class` is also the keyword token's kind.
                if class.is_named() {
                    controller_routes(class, source, path, &mut routes);
                }
            })
            .walk(tree.root());

        routes
    }
}

fn controller_routes(class: Node, source: &[u8], path: &Path, routes: &mut Vec<RouteDescriptor>) {
    let Some(controller) = class_decorators(class)
        .into_iter()
        .find(|d| decorator_name(*d, source) == Some(CONTROLLER_DECORATOR))
    else {
        return;
    };
    let Some(body) = class.child_by_field_name("body") else {
        return;
    };

    let prefix = controller_prefix(controller, source).unwrap_or_default();
    let controller_name = class_name(class, source);

    for (method, decorators) in decorated_methods(body) {
        let name = method.child_by_field_name("name");
        let handler = name
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let (line, column) = position(&name.unwrap_or(method), source);

        for decorator in decorators {
            let Some(name) = decorator_name(decorator, source) else {
                continue;
            };
            let Some(http_method) = HttpMethod::from_decorator(name) else {
                continue;
            };

            for fragment in method_fragments(decorator, source, path) {
                let route_path = combine_paths(&prefix, &fragment);
                routes.push(RouteDescriptor {
                    method: http_method,
                    params: tokenize_params(&route_path),
                    path: route_path,
                    handler: handler.clone(),
                    source_location: SourceLocation::new(path, line, column),
                    framework: Framework::NestJs,
                    middleware: None,
                    controller: Some(controller_name.clone()),
                });
            }
        }
    }
}

/// Decorators attached to a class, including ones written before `export`.
fn class_decorators(class: Node) -> Vec<Node> {
    let mut decorators = Vec::new();
    if let Some(parent) = class.parent() {
        if parent.kind() == "export_statement" {
            decorators.extend(
                named_children(parent)
                    .into_iter()
                    .filter(|n| n.kind() == "decorator"),
            );
        }
    }
    decorators.extend(
        named_children(class)
            .into_iter()
            .filter(|n| n.kind() == "decorator"),
    );
    decorators
}

/// Methods of a class body paired with their decorators.
///
/// The TypeScript grammar puts method decorators before the method as
/// siblings in the class body, the JavaScript grammar nests them inside the
/// method node. Both placements are collected.
fn decorated_methods(body: Node) -> Vec<(Node, Vec<Node>)> {
    let mut methods = Vec::new();
    let mut pending = Vec::new();

    for member in named_children(body) {
        match member.kind() {
            "decorator" => pending.push(member),
            "method_definition" => {
                let mut decorators = std::mem::take(&mut pending);
                decorators.extend(
                    named_children(member)
                        .into_iter()
                        .filter(|n| n.kind() == "decorator"),
                );
                if !decorators.is_empty() {
                    methods.push((member, decorators));
                }
            }
            _ => pending.clear(),
        }
    }
    methods
}

/// `Get` for `@Get`, `@Get(...)` and `@common.Get(...)`.
fn decorator_name<'s>(decorator: Node, source: &'s [u8]) -> Option<&'s str> {
    let expr = named_children(decorator).into_iter().next()?;
    callee_name(expr, source)
}

fn callee_name<'s>(node: Node, source: &'s [u8]) -> Option<&'s str> {
    match Expr::classify(node) {
        Expr::Identifier(ident) => Some(node_text(&ident, source)),
        Expr::Member { property, .. } => Some(node_text(&property, source)),
        Expr::Call { function, .. } => callee_name(function, source),
        _ => None,
    }
}

fn decorator_arguments(decorator: Node) -> Vec<Node> {
    let Some(expr) = named_children(decorator).into_iter().next() else {
        return Vec::new();
    };
    match Expr::classify(expr) {
        Expr::Call { arguments, .. } => named_children(arguments),
        _ => Vec::new(),
    }
}

/// Normalized prefix from `@Controller('cats')` or `@Controller({ path: 'cats' })`.
fn controller_prefix(decorator: Node, source: &[u8]) -> Option<String> {
    let first = decorator_arguments(decorator).into_iter().next()?;
    let raw = match Expr::classify(first) {
        Expr::Object(object) => object_path(object, source)?,
        _ => literal_value(first, source)?,
    };
    Some(normalize_path(&raw))
}

/// Literal value of the `path` property of an options object.
fn object_path(object: Node, source: &[u8]) -> Option<String> {
    named_children(object)
        .into_iter()
        .filter(|pair| pair.kind() == "pair")
        .find_map(|pair| {
            let key = pair.child_by_field_name("key")?;
            let key = literal_value(key, source)
                .unwrap_or_else(|| node_text(&key, source).to_string());
            if key != "path" {
                return None;
            }
            literal_value(pair.child_by_field_name("value")?, source)
        })
}

/// Path fragments a verb decorator contributes.
///
/// No argument means the controller root. A literal or an array of literals
/// gives one fragment each. An unresolvable argument gives nothing.
fn method_fragments(decorator: Node, source: &[u8], path: &Path) -> Vec<String> {
    let Some(first) = decorator_arguments(decorator).into_iter().next() else {
        return vec![String::new()];
    };

    let fragments: Vec<String> = match Expr::classify(first) {
        Expr::Array(array) => named_children(array)
            .into_iter()
            .filter_map(|element| literal_value(element, source))
            .collect(),
        _ => literal_value(first, source).into_iter().collect(),
    };

    if fragments.is_empty() {
        let (line, _) = position(&decorator, source);
        debug!(
            file = %path.display(),
            line,
            "skipping verb decorator with unresolvable path"
        );
    }
    fragments.into_iter().map(|f| normalize_path(&f)).collect()
}

/// Class name, or the declarator name for `const X = class {}`.
fn class_name(class: Node, source: &[u8]) -> String {
    if let Some(name) = class.child_by_field_name("name") {
        return node_text(&name, source).to_string();
    }
    class
        .parent()
        .filter(|p| p.kind() == "variable_declarator")
        .and_then(|p| p.child_by_field_name("name"))
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_else(|| ANONYMOUS_CONTROLLER.to_string())
}
