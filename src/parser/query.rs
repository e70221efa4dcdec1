//! Framework-agnostic queries over JavaScript/TypeScript syntax trees.

use std::collections::HashSet;

use tree_sitter::Node;

use super::tree::position;
use super::visit::Visitor;
use crate::route::path::strip_quotes;

/// Placeholder for interpolations that are not a bare identifier.
pub const GENERIC_PLACEHOLDER: &str = ":param";

/// The expression shapes route extraction cares about.
#[derive(Debug, Clone, Copy)]
pub enum Expr<'t> {
    Identifier(Node<'t>),
    Member { object: Node<'t>, property: Node<'t> },
    String(Node<'t>),
    Template(Node<'t>),
    Function { name: Option<Node<'t>> },
    Call { function: Node<'t>, arguments: Node<'t> },
    Array(Node<'t>),
    Object(Node<'t>),
    Other(Node<'t>),
}

impl<'t> Expr<'t> {
    /// Classify a node, looking through parentheses and TS non-null assertions.
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "identifier" => Expr::Identifier(node),
            "member_expression" => {
                match (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("property"),
                ) {
                    (Some(object), Some(property)) => Expr::Member { object, property },
                    _ => Expr::Other(node),
                }
            }
            "string" => Expr::String(node),
            "template_string" => Expr::Template(node),
            "arrow_function" | "function_expression" | "function" | "generator_function" => {
                Expr::Function {
                    name: node.child_by_field_name("name"),
                }
            }
            "call_expression" => {
                match (
                    node.child_by_field_name("function"),
                    node.child_by_field_name("arguments"),
                ) {
                    (Some(function), Some(arguments)) => Expr::Call {
                        function,
                        arguments,
                    },
                    _ => Expr::Other(node),
                }
            }
            "array" => Expr::Array(node),
            "object" => Expr::Object(node),
            "parenthesized_expression" | "non_null_expression" => {
                match named_children(node).into_iter().next() {
                    Some(inner) => Expr::classify(inner),
                    None => Expr::Other(node),
                }
            }
            _ => Expr::Other(node),
        }
    }
}

/// Text of a node, empty if it is not valid UTF-8.
pub fn node_text<'s>(node: &Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Named children minus comments.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Resolve a node to a string when it is a string or template literal.
///
/// Template interpolations become `:name` for a bare identifier and
/// [`GENERIC_PLACEHOLDER`] for anything else.
pub fn literal_value(node: Node, source: &[u8]) -> Option<String> {
    match Expr::classify(node) {
        Expr::String(n) => Some(strip_quotes(node_text(&n, source)).to_string()),
        Expr::Template(n) => Some(reconstruct_template(n, source)),
        _ => None,
    }
}

fn reconstruct_template(node: Node, source: &[u8]) -> String {
    let start = node.start_byte();
    let mut end = node.end_byte();
    if end > start && source.get(end - 1) == Some(&b'`') {
        end -= 1;
    }
    let mut cursor = start + usize::from(source.get(start) == Some(&b'`'));

    let mut out = String::new();
    for child in named_children(node) {
        if child.kind() != "template_substitution" {
            continue;
        }
        out.push_str(byte_slice(source, cursor, child.start_byte()));
        out.push_str(&interpolation_placeholder(child, source));
        cursor = child.end_byte();
    }
    out.push_str(byte_slice(source, cursor, end));
    out
}

fn interpolation_placeholder(substitution: Node, source: &[u8]) -> String {
    match named_children(substitution).into_iter().next().map(Expr::classify) {
        Some(Expr::Identifier(ident)) => format!(":{}", node_text(&ident, source)),
        _ => GENERIC_PLACEHOLDER.to_string(),
    }
}

fn byte_slice(source: &[u8], from: usize, to: usize) -> &str {
    if from >= to || to > source.len() {
        return "";
    }
    std::str::from_utf8(&source[from..to]).unwrap_or("")
}

/// Dotted name of an identifier or member chain, e.g. `api.v1.router`.
///
/// Returns `None` when the chain bottoms out on anything but an identifier
/// (`this.router`, `getRouter().get`, ...).
pub fn qualified_name(node: Node, source: &[u8]) -> Option<String> {
    match Expr::classify(node) {
        Expr::Identifier(ident) => Some(node_text(&ident, source).to_string()),
        Expr::Member { object, property } => {
            let base = qualified_name(object, source)?;
            Some(format!("{}.{}", base, node_text(&property, source)))
        }
        _ => None,
    }
}

/// Human-readable name for a handler argument.
pub fn handler_name(node: Node, source: &[u8]) -> String {
    match Expr::classify(node) {
        Expr::Identifier(ident) => node_text(&ident, source).to_string(),
        Expr::Function { name: Some(name) } => node_text(&name, source).to_string(),
        Expr::Function { name: None } => "anonymous".to_string(),
        Expr::Member { .. } => {
            qualified_name(node, source).unwrap_or_else(|| "unknown".to_string())
        }
        _ => "unknown".to_string(),
    }
}

/// Could this argument be the function that handles a request?
pub fn is_handler_like(node: Node) -> bool {
    matches!(
        Expr::classify(node),
        Expr::Identifier(_) | Expr::Function { .. } | Expr::Member { .. }
    )
}

/// A `receiver.method(...)` call that matched the candidate sets.
#[derive(Debug, Clone)]
pub struct CallSite<'t> {
    pub receiver: String,
    pub method: String,
    pub arguments: Vec<Node<'t>>,
    pub line: usize,
    pub column: usize,
}

/// Find every `receiver.method(...)` call under `root` whose receiver's
/// qualified name is in `receivers` and whose method is in `methods`.
pub fn find_calls<'t>(
    root: Node<'t>,
    source: &[u8],
    receivers: &HashSet<String>,
    methods: &[&str],
) -> Vec<CallSite<'t>> {
    let mut calls = Vec::new();

    Visitor::new()
        .on("call_expression", |node| {
            if let Some(call) = match_call(node, source, receivers, methods) {
                calls.push(call);
            }
        })
        .walk(root);

    calls
}

fn match_call<'t>(
    node: Node<'t>,
    source: &[u8],
    receivers: &HashSet<String>,
    methods: &[&str],
) -> Option<CallSite<'t>> {
    let Expr::Call {
        function,
        arguments,
    } = Expr::classify(node)
    else {
        return None;
    };
    let Expr::Member { object, property } = Expr::classify(function) else {
        return None;
    };

    let method = node_text(&property, source);
    if !methods.contains(&method) {
        return None;
    }
    let receiver = qualified_name(object, source)?;
    if !receivers.contains(&receiver) {
        return None;
    }

    let (line, column) = position(&node, source);
    Some(CallSite {
        receiver,
        method: method.to_string(),
        arguments: named_children(arguments),
        line,
        column,
    })
}
