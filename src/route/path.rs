//! Route path normalization and parameter tokenization.
//!
//! Paths handed out by the extractors always start with `/`, never contain
//! `//`, and only end with `/` when they are the root path.

use super::types::RouteParam;

/// Normalize a raw path literal into a route pattern.
///
/// Strips one pair of surrounding quotes, forces a single leading `/`,
/// collapses `/` runs and drops a trailing `/` (root stays `/`).
pub fn normalize_path(raw: &str) -> String {
    let inner = strip_quotes(raw);

    let mut result = String::with_capacity(inner.len() + 1);
    result.push('/');
    for c in inner.chars() {
        if c == '/' && result.ends_with('/') {
            continue;
        }
        result.push(c);
    }

    if result.len() > 1 && result.ends_with('/') {
        result.pop();
    }
    result
}

/// Join a controller prefix and a method fragment.
///
/// Both sides are trimmed of slashes independently before joining, so
/// `combine_paths("api/", "/users/")` is `/api/users`.
pub fn combine_paths(prefix: &str, fragment: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let fragment = fragment.trim_matches('/');

    let joined = match (prefix.is_empty(), fragment.is_empty()) {
        (true, true) => return "/".to_string(),
        (true, false) => format!("/{fragment}"),
        (false, true) => format!("/{prefix}"),
        (false, false) => format!("/{prefix}/{fragment}"),
    };
    normalize_path(&joined)
}

/// Collect `:name` tokens from a path, left to right.
///
/// A trailing `?` marks the parameter optional and is not part of the name.
/// Repeated names produce one entry per occurrence.
pub fn tokenize_params(path: &str) -> Vec<RouteParam> {
    let mut params = Vec::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ':' || !chars.peek().is_some_and(|n| is_ident_start(*n)) {
            continue;
        }

        let mut name = String::new();
        while let Some(&n) = chars.peek() {
            if !is_ident_char(n) {
                break;
            }
            name.push(n);
            chars.next();
        }

        let required = if chars.peek() == Some(&'?') {
            chars.next();
            false
        } else {
            true
        };
        params.push(RouteParam::path(name, required));
    }

    params
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Strip one matching pair of `'`, `"` or `` ` `` quotes.
pub fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return s;
    }

    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if first == last && matches!(first, b'"' | b'\'' | b'`') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("users"), "/users");
        assert_eq!(normalize_path("/users/"), "/users");
        assert_eq!(normalize_path("'/users'"), "/users");
        assert_eq!(normalize_path("\"//api///users//\""), "/api/users");
        assert_eq!(normalize_path("`/items/:id`"), "/items/:id");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("''"), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "/",
            "users",
            "'/a//b/'",
            "`x`",
            "\"'nested'\"",
            "/users/:id?",
            "a /",
            " /spaced/ ",
            "*",
        ];
        for raw in samples {
            let once = normalize_path(raw);
            assert_eq!(normalize_path(&once), once, "not idempotent for {raw:?}");
            assert!(once.starts_with('/'));
            assert!(!once.contains("//"));
            assert!(once == "/" || !once.ends_with('/'));
        }
    }

    #[test]
    fn test_combine_paths() {
        assert_eq!(combine_paths("", ""), "/");
        assert_eq!(combine_paths("api", ""), "/api");
        assert_eq!(combine_paths("", "users"), "/users");
        assert_eq!(combine_paths("api/", "/users/"), "/api/users");
        assert_eq!(combine_paths("/cats", ":id"), "/cats/:id");
        assert_eq!(combine_paths("/", "/"), "/");
        assert_eq!(combine_paths("v1//admin", "x"), "/v1/admin/x");
    }

    #[test]
    fn test_tokenize_params() {
        let params = tokenize_params("/users/:id/posts/:postId");
        assert_eq!(
            params,
            vec![RouteParam::path("id", true), RouteParam::path("postId", true)]
        );

        assert!(tokenize_params("/health").is_empty());
        assert!(tokenize_params("/time/12:30").is_empty());
    }

    #[test]
    fn test_tokenize_optional_param() {
        assert_eq!(
            tokenize_params("/users/:id?"),
            vec![RouteParam::path("id", false)]
        );
        assert_eq!(
            tokenize_params("/files/:dir?/:name"),
            vec![RouteParam::path("dir", false), RouteParam::path("name", true)]
        );
    }

    #[test]
    fn test_tokenize_keeps_repeats() {
        let params = tokenize_params("/a/:param/b/:param");
        assert_eq!(params.len(), 2);
        assert!(params.iter().all(|p| p.name == "param" && p.required));
    }

    #[test]
    fn test_token_count_matches_path() {
        for path in ["/a/:x/:y/:z", "/:only", "/:a-:b", "/users/:user_id/:$ref"] {
            let colons = path.matches(':').count();
            assert_eq!(tokenize_params(path).len(), colons, "{path}");
        }
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"hello\""), "hello");
        assert_eq!(strip_quotes("'hello'"), "hello");
        assert_eq!(strip_quotes("`hello`"), "hello");
        assert_eq!(strip_quotes("'mixed\""), "'mixed\"");
        assert_eq!(strip_quotes("hello"), "hello");
        assert_eq!(strip_quotes("'"), "'");
    }
}
