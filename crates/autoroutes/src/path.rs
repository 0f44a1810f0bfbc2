//! Path-to-pattern translation.
//!
//! All functions are **pure**: given same input, always produce same output
//! with no side effects. They operate on routes-root-relative paths, already
//! normalized to forward slashes by [`normalize_separators`].
//!
//! ## File Naming Convention
//!
//! | File Path                    | Route Pattern    |
//! |------------------------------|------------------|
//! | `index.rs`                   | `/`              |
//! | `status.rs`                  | `/status`        |
//! | `users/index.rs`             | `/users`         |
//! | `users/{userId}/index.rs`    | `/users/:userId` |
//! | `_private.rs` / `.hidden.rs` | excluded         |
//! | `smoke.test.rs`              | excluded         |

/// Source-module extensions recognized during discovery.
pub const MODULE_EXTENSIONS: &[&str] = &["rs"];

/// Translates a routes-root-relative file path into a route pattern.
///
/// The relative path may carry a leading slash; backslashes are accepted and
/// normalized. Segments named exactly `index` contribute no path segment,
/// and segments fully wrapped as `{name}` become the `:name` parameter
/// capture syntax expected by the host router.
///
/// An empty result is exactly `/` and the prefix is not applied to it;
/// every other pattern is prefixed exactly once.
///
/// # Examples
///
/// ```
/// use autoroutes::path::translate;
///
/// assert_eq!(translate("/index.rs", ""), "/");
/// assert_eq!(translate("/users/{userId}/index.rs", ""), "/users/:userId");
/// assert_eq!(translate("/a/status.rs", "/api"), "/api/a/status");
/// ```
pub fn translate(relative_path: &str, prefix: &str) -> String {
    let normalized = normalize_separators(relative_path);
    let stripped = strip_module_extension(&normalized);

    let segments: Vec<String> = stripped
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "index")
        .map(rewrite_parameter)
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("{}/{}", prefix, segments.join("/"))
    }
}

/// Rewrites a `{name}` segment to `:name`; any other segment passes through.
///
/// Only segments fully wrapped in braces are parameters; a brace appearing
/// mid-segment is treated as literal text.
///
/// # Examples
///
/// ```
/// use autoroutes::path::rewrite_parameter;
///
/// assert_eq!(rewrite_parameter("{userId}"), ":userId");
/// assert_eq!(rewrite_parameter("status"), "status");
/// ```
pub fn rewrite_parameter(segment: &str) -> String {
    match segment
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
    {
        Some(name) if !name.is_empty() => format!(":{name}"),
        _ => segment.to_string(),
    }
}

/// Decides whether a base file name participates in discovery.
///
/// Excluded: names starting with `.` or `_`, names without a recognized
/// extension, and names whose stem ends in `.test`.
///
/// # Examples
///
/// ```
/// use autoroutes::path::is_route_file;
///
/// assert!(is_route_file("index.rs"));
/// assert!(is_route_file("{userId}.rs"));
///
/// assert!(!is_route_file(".hidden.rs"));
/// assert!(!is_route_file("_private.rs"));
/// assert!(!is_route_file("smoke.test.rs"));
/// assert!(!is_route_file("notes.txt"));
/// ```
pub fn is_route_file(base_name: &str) -> bool {
    if base_name.starts_with('.') || base_name.starts_with('_') {
        return false;
    }

    let stem = strip_module_extension(base_name);
    if stem.len() == base_name.len() {
        // No recognized extension was stripped.
        return false;
    }

    !stem.ends_with(".test")
}

/// Normalizes path separators to forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Strips one recognized module extension, if present.
pub(crate) fn strip_module_extension(path: &str) -> &str {
    for extension in MODULE_EXTENSIONS {
        if let Some(stem) = path.strip_suffix(extension) {
            if let Some(stem) = stem.strip_suffix('.') {
                return stem;
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/index.rs", "", "/")]
    #[case("/users/{userId}/index.rs", "", "/users/:userId")]
    #[case("/a/status.rs", "/api", "/api/a/status")]
    #[case("/users/index.rs", "", "/users")]
    #[case("/users.rs", "", "/users")]
    #[case("/users/{userId}/posts/{postId}.rs", "", "/users/:userId/posts/:postId")]
    #[case("\\users\\{userId}\\index.rs", "", "/users/:userId")]
    #[case("/index.rs", "/api", "/")]
    fn translate_cases(#[case] relative: &str, #[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(translate(relative, prefix), expected);
    }

    #[test]
    fn translated_patterns_have_no_index_or_braces() {
        let inputs = [
            "/index.rs",
            "/users/index.rs",
            "/users/{userId}/index.rs",
            "/deeply/nested/{a}/{b}/index.rs",
        ];

        for input in inputs {
            let pattern = translate(input, "/v1");
            assert!(!pattern.contains('{'), "braces left in {pattern}");
            assert!(!pattern.contains('}'), "braces left in {pattern}");
            for segment in pattern.split('/') {
                assert_ne!(segment, "index", "index left in {pattern}");
            }
        }
    }

    #[test]
    fn prefix_is_applied_exactly_once() {
        let pattern = translate("/a/status.rs", "/api");
        assert_eq!(pattern.matches("/api").count(), 1);
    }

    #[test]
    fn literal_braces_inside_a_segment_are_kept() {
        assert_eq!(translate("/a{b}c.rs", ""), "/a{b}c");
        assert_eq!(rewrite_parameter("{}"), "{}");
    }

    #[test]
    fn extension_stripping_only_removes_the_suffix() {
        // A segment that merely contains an extension-like substring keeps it.
        assert_eq!(translate("/rsync/index.rs", ""), "/rsync");
        assert_eq!(translate("/indexes.rs", ""), "/indexes");
    }

    #[rstest]
    #[case("index.rs", true)]
    #[case("status.rs", true)]
    #[case("{userId}.rs", true)]
    #[case(".hidden.rs", false)]
    #[case("_private.rs", false)]
    #[case("smoke.test.rs", false)]
    #[case("notes.txt", false)]
    #[case("index", false)]
    fn route_file_filter(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_route_file(name), expected);
    }
}
