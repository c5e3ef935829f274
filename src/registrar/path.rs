//! Route pattern syntax translation.
//!
//! Declarations use `:name` for a named segment, `*` for an unnamed
//! segment, `**` for "everything below" and `**:name` for a named rest.
//! Axum expects `{name}` and `{*name}`; literal braces must be doubled.

use thiserror::Error;

/// A route pattern axum cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathSyntaxError {
    #[error("empty parameter name in `{0}`")]
    EmptyParam(String),
    #[error("catch-all must be the last segment in `{0}`")]
    CatchAllNotLast(String),
    #[error("segment `{segment}` in `{path}` starts with a reserved character")]
    Reserved { path: String, segment: String },
}

/// Translate a declared pattern into axum's route syntax.
pub fn to_axum_path(path: &str) -> Result<String, PathSyntaxError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Ok("/".to_string());
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    let last = segments.len() - 1;
    let mut unnamed = 0usize;
    let mut out = String::with_capacity(path.len() + 8);

    for (i, segment) in segments.iter().enumerate() {
        out.push('/');
        if let Some(rest) = segment.strip_prefix("**") {
            if i != last {
                return Err(PathSyntaxError::CatchAllNotLast(path.to_string()));
            }
            let name = match rest.strip_prefix(':') {
                Some("") => return Err(PathSyntaxError::EmptyParam(path.to_string())),
                Some(name) => name,
                None if rest.is_empty() => "_",
                None => {
                    return Err(PathSyntaxError::Reserved {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
            };
            out.push_str("{*");
            out.push_str(name);
            out.push('}');
        } else if *segment == "*" {
            out.push_str(&format!("{{_{}}}", unnamed));
            unnamed += 1;
        } else if let Some(name) = segment.strip_prefix(':') {
            if name.is_empty() {
                return Err(PathSyntaxError::EmptyParam(path.to_string()));
            }
            out.push('{');
            out.push_str(name);
            out.push('}');
        } else if segment.starts_with('*') {
            return Err(PathSyntaxError::Reserved {
                path: path.to_string(),
                segment: segment.to_string(),
            });
        } else {
            out.push_str(&segment.replace('{', "{{").replace('}', "}}"));
        }
    }

    Ok(out)
}

/// Axum path with parameter names erased: `/users/{id}` becomes `/users/{}`.
///
/// Paths with equal shapes match the same requests.
pub fn path_shape(axum_path: &str) -> String {
    let mut out = String::with_capacity(axum_path.len());
    let mut chars = axum_path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push_str("{{");
            }
            '{' => {
                let catch_all = chars.peek() == Some(&'*');
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                out.push_str(if catch_all { "{*}" } else { "{}" });
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parent of a path whose last segment is `**` or `**:name`.
///
/// `/files/**` also matches `/files`, which axum's catch-all does not.
pub fn catch_all_parent(path: &str) -> Option<String> {
    let (parent, last) = path.trim_end_matches('/').rsplit_once('/')?;
    if !last.starts_with("**") {
        return None;
    }
    Some(if parent.is_empty() {
        "/".to_string()
    } else {
        parent.to_string()
    })
}
