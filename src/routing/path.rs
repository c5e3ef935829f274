//! Path segment joining.

/// Join path segments into one canonical path.
///
/// Empty segments are dropped, runs of `/` collapse into one and a trailing
/// `/` is removed. Returns `/` when no segment contributes anything.
pub fn join_paths<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(segment);
    }

    let mut path = String::with_capacity(joined.len());
    for ch in joined.chars() {
        if ch == '/' && path.ends_with('/') {
            continue;
        }
        path.push(ch);
    }

    if path.ends_with('/') {
        path.pop();
    }

    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_join_simple_paths() {
        assert_eq!(join_paths(["/api", "users"]), "/api/users");
        assert_eq!(join_paths(["api", "users"]), "api/users");
    }

    #[test]
    fn test_leading_and_trailing_slashes() {
        assert_eq!(join_paths(["/api/", "/users/"]), "/api/users");
        assert_eq!(join_paths(["/api/", "users"]), "/api/users");
    }

    #[test]
    fn test_duplicate_slashes_collapse() {
        assert_eq!(join_paths(["/api//", "users"]), "/api/users");
        assert_eq!(join_paths(["/api", "//users"]), "/api/users");
        assert_eq!(join_paths(["///"]), "/");
    }

    #[test]
    fn test_empty_segments() {
        assert_eq!(join_paths(["/api", "", "users"]), "/api/users");
        assert_eq!(join_paths(["", "x", ""]), "x");
    }

    #[test]
    fn test_root_fallback() {
        assert_eq!(join_paths(["", "", ""]), "/");
        assert_eq!(join_paths(NONE), "/");
        assert_eq!(join_paths(["/"]), "/");
        assert_eq!(join_paths(["", "/"]), "/");
    }

    #[test]
    fn test_many_segments() {
        assert_eq!(
            join_paths(["/api", "v1", "users", "list"]),
            "/api/v1/users/list"
        );
    }
}
