//! Imperative (Express-style) route extraction.
//!
//! Detects calls like `router.get('/items/:id', auth, getItem)` on the
//! default `app`/`router` objects and on any variable initialised from
//! `express.Router()`, `Router()` or `express()`.
//!
//! Mounting is not followed: `app.use('/api', router)` does not prefix the
//! routes registered on `router`, so those are reported without `/api`.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use tree_sitter::Node;

use super::detect::looks_like_express;
use super::RouteExtractor;
use crate::parser::query::{
    find_calls, handler_name, is_handler_like, literal_value, named_children, node_text,
    CallSite, Expr,
};
use crate::parser::{SyntaxTree, Visitor};
use crate::route::{
    normalize_path, tokenize_params, Framework, HttpMethod, RouteDescriptor, SourceLocation,
};

/// Receivers treated as routers without any declaration.
pub const DEFAULT_ROUTERS: &[&str] = &["app", "router"];

/// Router methods that register a route.
pub const VERB_METHODS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "options", "head", "all",
];

/// Callees whose result is a router or app object.
const ROUTER_FACTORIES: &[&str] = &["Router", "express"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressExtractor;

impl ExpressExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl RouteExtractor for ExpressExtractor {
    fn framework(&self) -> Framework {
        Framework::Express
    }

    fn classify(&self, text: &str, _path: &Path) -> bool {
        looks_like_express(text)
    }

    fn extract_tree(&self, tree: &SyntaxTree<'_>, path: &Path) -> Vec<RouteDescriptor> {
        let source = tree.source();
        let routers = router_names(tree.root(), source);

        find_calls(tree.root(), source, &routers, VERB_METHODS)
            .iter()
            .filter_map(|call| route_from_call(call, source, path))
            .collect()
    }
}

/// Default router names plus every declarator initialised from a factory.
fn router_names(root: Node, source: &[u8]) -> HashSet<String> {
    let mut names: HashSet<String> = DEFAULT_ROUTERS.iter().map(|s| s.to_string()).collect();

    Visitor::new()
        .on("variable_declarator", |node| {
            let (Some(name), Some(value)) = (
                node.child_by_field_name("name"),
                node.child_by_field_name("value"),
            ) else {
                return;
            };
            if name.kind() == "identifier" && is_router_factory(value, source) {
                names.insert(node_text(&name, source).to_string());
            }
        })
        .walk(root);

    names
}

/// `express.Router()`, `Router()` or `express()`.
fn is_router_factory(node: Node, source: &[u8]) -> bool {
    let Expr::Call { function, .. } = Expr::classify(node) else {
        return false;
    };
    match Expr::classify(function) {
        Expr::Member { property, .. } => node_text(&property, source) == "Router",
        Expr::Identifier(ident) => ROUTER_FACTORIES.contains(&node_text(&ident, source)),
        _ => false,
    }
}

fn route_from_call(call: &CallSite, source: &[u8], path: &Path) -> Option<RouteDescriptor> {
    let (path_arg, rest) = call.arguments.split_first()?;

    // Non-literal first arguments are usually not routes (`app.get(key)`).
    let Some(raw_path) = literal_value(*path_arg, source) else {
        debug!(
            file = %path.display(),
            line = call.line,
            receiver = %call.receiver,
            method = %call.method,
            "skipping call with unresolvable path"
        );
        return None;
    };

    let method = HttpMethod::from_verb(&call.method)?;
    let route_path = normalize_path(&raw_path);

    let handler_index = rest
        .iter()
        .rposition(|arg| is_handler_like(*arg))
        .or_else(|| rest.len().checked_sub(1));

    let (handler, middleware) = match handler_index {
        Some(index) => (
            handler_name(rest[index], source),
            middleware_names(&rest[..index], source),
        ),
        None => ("unknown".to_string(), Vec::new()),
    };

    Some(RouteDescriptor {
        method,
        params: tokenize_params(&route_path),
        path: route_path,
        handler,
        source_location: SourceLocation::new(path, call.line, call.column),
        framework: Framework::Express,
        middleware: (!middleware.is_empty()).then_some(middleware),
        controller: None,
    })
}

/// Resolve middleware arguments by name, flattening array literals.
fn middleware_names(args: &[Node], source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    for arg in args {
        match Expr::classify(*arg) {
            Expr::Array(array) => names.extend(
                named_children(array)
                    .into_iter()
                    .map(|element| handler_name(element, source)),
            ),
            _ => names.push(handler_name(*arg, source)),
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteParam;
    use std::path::PathBuf;

    /// Also checks that the classifier never rejects a file with routes.
    fn extract(src: &str) -> Vec<RouteDescriptor> {
        let routes = ExpressExtractor::new()
            .extract(src, &PathBuf::from("src/routes/items.js"))
            .routes;
        if !routes.is_empty() {
            assert!(looks_like_express(src), "classifier rejected:\n{src}");
        }
        routes
    }

    #[test]
    fn test_router_with_middleware() {
        let src = "const router = express.Router();\nrouter.get('/items/:id', auth, getItem);\n";
        let routes = extract(src);

        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.method, HttpMethod::Get);
        assert_eq!(route.path, "/items/:id");
        assert_eq!(route.handler, "getItem");
        assert_eq!(route.middleware, Some(vec!["auth".to_string()]));
        assert_eq!(route.params, vec![RouteParam::path("id", true)]);
        assert_eq!(route.framework, Framework::Express);
        assert_eq!(route.source_location.line, 2);
        assert_eq!(route.source_location.column, 0);
        assert_eq!(route.controller, None);
    }

    #[test]
    fn test_undeclared_receiver_is_ignored() {
        assert!(extract("foo.get('/x', handler);").is_empty());
    }

    #[test]
    fn test_declared_router_names() {
        let src = r#"
const express = require('express');
const users = express.Router();
const admin = Router();
const server = express();
users.post('/users', createUser);
admin.delete('/users/:id', removeUser);
server.put('/config', saveConfig);
"#;
        let routes = extract(src);
        let summary: Vec<(HttpMethod, &str, &str)> = routes
            .iter()
            .map(|r| (r.method, r.path.as_str(), r.handler.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (HttpMethod::Post, "/users", "createUser"),
                (HttpMethod::Delete, "/users/:id", "removeUser"),
                (HttpMethod::Put, "/config", "saveConfig"),
            ]
        );
    }

    #[test]
    fn test_all_verbs_upper_cased() {
        let src = r#"
app.get('/a', h); app.post('/a', h); app.put('/a', h); app.delete('/a', h);
app.patch('/a', h); app.options('/a', h); app.head('/a', h); app.all('/a', h);
"#;
        let methods: Vec<HttpMethod> = extract(src).iter().map(|r| r.method).collect();
        assert_eq!(methods, HttpMethod::ALL_METHODS.to_vec());
    }

    #[test]
    fn test_non_literal_path_is_skipped() {
        let src = "app.get(PATH, handler);\napp.get('env');\napp.get(/^\\/re/, h);\n";
        let routes = extract(src);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/env");
        assert_eq!(routes[0].handler, "unknown");
        assert_eq!(routes[0].middleware, None);
    }

    #[test]
    fn test_handler_forms() {
        let src = r#"
router.get('/anon', (req, res) => res.send('ok'));
router.get('/named', function listThings(req, res) {});
router.get('/member', controllers.items.list);
router.get('/wrapped', auth, wrap(list));
"#;
        let routes = extract(src);
        let handlers: Vec<&str> = routes.iter().map(|r| r.handler.as_str()).collect();
        assert_eq!(
            handlers,
            vec!["anonymous", "listThings", "controllers.items.list", "auth"]
        );
        // A trailing non-handler argument is skipped when a handler precedes it.
        assert_eq!(routes[3].middleware, None);
    }

    #[test]
    fn test_fallback_to_last_argument() {
        let routes = extract("router.get('/x', wrap(a), wrap(b));");
        assert_eq!(routes[0].handler, "unknown");
        assert_eq!(routes[0].middleware, Some(vec!["unknown".to_string()]));
    }

    #[test]
    fn test_array_middleware_is_flattened() {
        let src = "router.post('/orders', [auth, validate], rateLimit, createOrder);";
        let routes = extract(src);
        assert_eq!(routes[0].handler, "createOrder");
        assert_eq!(
            routes[0].middleware,
            Some(vec![
                "auth".to_string(),
                "validate".to_string(),
                "rateLimit".to_string()
            ])
        );
    }

    #[test]
    fn test_template_path_and_normalization() {
        let src = "router.get(`/users/${userId}/posts//`, h);\nrouter.get('', root);";
        let routes = extract(src);
        assert_eq!(routes[0].path, "/users/:userId/posts");
        assert_eq!(routes[0].params, vec![RouteParam::path("userId", true)]);
        assert_eq!(routes[1].path, "/");
        assert!(routes[1].params.is_empty());
    }

    #[test]
    fn test_optional_param_keeps_marker_in_path() {
        let routes = extract("router.get('/users/:id?', show);");
        assert_eq!(routes[0].path, "/users/:id?");
        assert_eq!(routes[0].params, vec![RouteParam::path("id", false)]);
    }

    #[test]
    fn test_mounted_router_prefix_is_not_applied() {
        let src = "const api = express.Router();\napi.get('/status', status);\napp.use('/api', api);\n";
        let routes = extract(src);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/status");
    }

    #[test]
    fn test_column_after_non_ascii_text() {
        let routes = extract("const x = 1;\nconst é = 1; app.get('/x', h);\n");
        assert_eq!(routes[0].source_location.line, 2);
        assert_eq!(routes[0].source_location.column, 13);
    }

    #[test]
    fn test_classify() {
        let extractor = ExpressExtractor::new();
        let path = PathBuf::from("server.js");
        assert!(extractor.classify("const express = require('express');", &path));
        assert!(!extractor.classify("export const x = 1;", &path));
    }
}
