//! Kind-keyed tree traversal.
//!
//! A [`Visitor`] maps node kinds to callbacks and walks a tree in document
//! order, firing every callback registered for each node's kind.

use std::collections::HashMap;

use tree_sitter::Node;

type Callback<'a, 't> = Box<dyn FnMut(Node<'t>) + 'a>;

#[derive(Default)]
pub struct Visitor<'a, 't> {
    callbacks: Vec<Callback<'a, 't>>,
    by_kind: HashMap<&'static str, Vec<usize>>,
}

impl<'a, 't> Visitor<'a, 't> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Register a callback for a node kind.
    pub fn on<F>(self, kind: &'static str, callback: F) -> Self
    where
        F: FnMut(Node<'t>) + 'a,
    {
        self.on_kinds(&[kind], callback)
    }

    /// Register one callback shared by several node kinds.
    pub fn on_kinds<F>(mut self, kinds: &[&'static str], callback: F) -> Self
    where
        F: FnMut(Node<'t>) + 'a,
    {
        let index = self.callbacks.len();
        self.callbacks.push(Box::new(callback));
        for kind in kinds {
            self.by_kind.entry(*kind).or_default().push(index);
        }
        self
    }

    /// Pre-order walk of `root` and all its descendants.
    pub fn walk(&mut self, root: Node<'t>) {
        if self.callbacks.is_empty() {
            return;
        }

        let mut cursor = root.walk();
        loop {
            let node = cursor.node();
            if let Some(indices) = self.by_kind.get(node.kind()) {
                for &index in indices {
                    (self.callbacks[index])(node);
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tree::{ParserProfile, SyntaxTree};
    use std::path::PathBuf;

    #[test]
    fn test_visits_in_document_order() {
        let src = "a(); function f() { b(); c(); }";
        let tree =
            SyntaxTree::parse(src, &PathBuf::from("x.js"), &ParserProfile::default()).unwrap();

        let mut names = Vec::new();
        let mut functions = 0;
        Visitor::new()
            .on("call_expression", |node| {
                let callee = node.child_by_field_name("function").unwrap();
                names.push(callee.utf8_text(tree.source()).unwrap().to_string());
            })
            .on("function_declaration", |_| functions += 1)
            .walk(tree.root());

        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(functions, 1);
    }

    #[test]
    fn test_shared_callback_for_several_kinds() {
        let src = "let a = 1; const b = 2; var c = 3;";
        let tree =
            SyntaxTree::parse(src, &PathBuf::from("x.js"), &ParserProfile::default()).unwrap();

        let mut kinds = Vec::new();
        Visitor::new()
            .on_kinds(&["lexical_declaration", "variable_declaration"], |node| {
                kinds.push(node.kind())
            })
            .walk(tree.root());

        assert_eq!(
            kinds,
            vec!["lexical_declaration", "lexical_declaration", "variable_declaration"]
        );
    }
}
