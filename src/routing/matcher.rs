//! Path template matching.
//!
//! # Responsibilities
//! - Parse route patterns such as `/snippets/{id}/` into segments
//! - Match request paths against a pattern, capturing dynamic segments
//! - Render a pattern back into a path (reverse routing)
//!
//! # Design Decisions
//! - Path matching is case-sensitive and exact per segment
//! - Both pattern and path must start and end with `/`
//! - A dynamic segment matches exactly one non-empty segment
//! - Captured values are the raw (still percent-encoded) segment text
//! - No regex to guarantee O(n) matching

use crate::routing::error::{RegistrationError, ReverseError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a pattern. `{name}` segments become captures, everything
    /// else is matched literally.
    pub fn new(pattern: impl Into<String>) -> Result<Self, RegistrationError> {
        let pattern = pattern.into();
        let invalid = |reason: &'static str| RegistrationError::InvalidPattern {
            pattern: pattern.clone(),
            reason,
        };

        let parts =
            split_segments(&pattern).ok_or_else(|| invalid("must start and end with '/'"))?;
        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let segment = match part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some("") => return Err(invalid("capture has no name")),
                Some(name) => Segment::Param(name.to_string()),
                None if part.is_empty() => return Err(invalid("contains an empty segment")),
                None if part.contains(['{', '}']) => return Err(invalid("unbalanced brace")),
                None => Segment::Literal(part.to_string()),
            };
            segments.push(segment);
        }
        Ok(Self { pattern, segments })
    }

    /// The pattern text, e.g. `/users/{id}/`.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Names of the dynamic segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a request path, returning captured parameters on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts = split_segments(path)?;
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.push(name, part);
                }
            }
        }
        Some(params)
    }

    /// Substitute parameters into the pattern.
    pub fn render(&self, route: &str, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        let mut path = String::from("/");
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param(name) => {
                    let value = params
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| *v)
                        .ok_or_else(|| ReverseError::MissingParameter {
                            route: route.to_string(),
                            param: name.clone(),
                        })?;
                    if !is_valid_segment_value(value) {
                        return Err(ReverseError::InvalidParameter {
                            param: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    path.push_str(value);
                }
            }
            path.push('/');
        }
        Ok(path)
    }
}

/// Parameters captured from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split `/a/b/` into `["a", "b"]`. `/` yields no segments; paths that do
/// not begin and end with a slash yield `None`.
fn split_segments(path: &str) -> Option<Vec<&str>> {
    let inner = path.strip_prefix('/')?;
    if inner.is_empty() {
        return Some(Vec::new());
    }
    let inner = inner.strip_suffix('/')?;
    Some(inner.split('/').collect())
}

fn is_valid_segment_value(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '?', '#'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let template = PathTemplate::new("/snippets/").unwrap();

        assert!(template.matches("/snippets/").is_some());
        assert!(template.matches("/snippets").is_none());
        assert!(template.matches("/Snippets/").is_none()); // Case sensitive
        assert!(template.matches("/snippets/1/").is_none());
    }

    #[test]
    fn test_param_capture() {
        let template = PathTemplate::new("/users/{id}/").unwrap();
        let params = template.matches("/users/42/").unwrap();

        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("pk"), None);
        assert!(template.matches("/users//").is_none());
        assert!(template.matches("/users/42/extra/").is_none());
    }

    #[test]
    fn test_root_template() {
        let template = PathTemplate::new("/").unwrap();

        let params = template.matches("/").unwrap();
        assert!(params.is_empty());
        assert!(template.matches("/users/").is_none());
        assert!(template.matches("").is_none());
    }

    #[test]
    fn test_param_names() {
        let template = PathTemplate::new("/users/{pk}/").unwrap();
        assert_eq!(template.param_names().collect::<Vec<_>>(), vec!["pk"]);
    }

    #[test]
    fn test_render() {
        let template = PathTemplate::new("/users/{id}/").unwrap();

        assert_eq!(template.render("user-detail", &[("id", "7")]).unwrap(), "/users/7/");
        assert_eq!(
            template.render("user-detail", &[]),
            Err(ReverseError::MissingParameter {
                route: "user-detail".into(),
                param: "id".into(),
            })
        );
        assert!(matches!(
            template.render("user-detail", &[("id", "a/b")]),
            Err(ReverseError::InvalidParameter { .. })
        ));
        assert_eq!(PathTemplate::new("/").unwrap().render("api-root", &[]).unwrap(), "/");
    }

    #[test]
    fn test_malformed_patterns_are_rejected() {
        for pattern in ["/snippets", "snippets/", "", "/users//", "/users/{}/", "/users/{id/"] {
            assert!(
                matches!(
                    PathTemplate::new(pattern),
                    Err(RegistrationError::InvalidPattern { .. })
                ),
                "{pattern:?} should be rejected"
            );
        }
    }
}
