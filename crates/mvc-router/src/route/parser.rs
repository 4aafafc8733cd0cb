//! Route pattern parsing
//!
//! Turns a pattern string like `{controller}/{action}/{id}` into compiled
//! segments. Complex segments get a regex; every other kind is matched
//! directly.

use regex::{Regex, RegexBuilder};

use super::pattern::{classify_segment, PatternSegmentType, SegmentPart};
use crate::error::{Result, RouteError};
use crate::values::fold_key;

/// A compiled pattern segment
#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Parameter(String),
    CatchAll(String),
    Complex {
        parts: Vec<SegmentPart>,
        matcher: Regex,
    },
}

/// Result of parsing a route pattern
#[derive(Debug, Clone)]
pub struct ParsedPattern {
    pub segments: Vec<Segment>,
    /// Parameter names in declaration order
    pub params: Vec<String>,
    pub has_catch_all: bool,
}

/// Accumulator for the fold over segments
#[derive(Default)]
struct ParseState {
    segments: Vec<Segment>,
    params: Vec<String>,
    has_catch_all: bool,
}

impl ParseState {
    fn with_param(mut self, pattern: &str, name: &str) -> Result<Self> {
        let folded = fold_key(name);
        if self.params.iter().any(|p| fold_key(p) == folded) {
            return Err(RouteError::DuplicateParameter {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
        self.params.push(name.to_string());
        Ok(self)
    }

    fn with_segment(self, pattern: &str, segment: &str) -> Result<Self> {
        if self.has_catch_all {
            return Err(RouteError::CatchAllNotLast {
                pattern: pattern.to_string(),
            });
        }
        if segment.is_empty() {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "empty segment",
            });
        }

        match classify_segment(segment)? {
            PatternSegmentType::Literal(literal) => Ok(self.push(Segment::Literal(literal))),
            PatternSegmentType::Parameter(name) => {
                let state = self.with_param(pattern, &name)?;
                Ok(state.push(Segment::Parameter(name)))
            }
            PatternSegmentType::CatchAll(name) => {
                let mut state = self.with_param(pattern, &name)?;
                state.has_catch_all = true;
                Ok(state.push(Segment::CatchAll(name)))
            }
            PatternSegmentType::Complex(parts) => {
                let mut state = self;
                for part in &parts {
                    if let SegmentPart::Parameter(name) = part {
                        state = state.with_param(pattern, name)?;
                    }
                }
                let matcher = compile_complex(segment, &parts)?;
                Ok(state.push(Segment::Complex { parts, matcher }))
            }
        }
    }

    fn push(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    fn finish(self) -> ParsedPattern {
        ParsedPattern {
            segments: self.segments,
            params: self.params,
            has_catch_all: self.has_catch_all,
        }
    }
}

/// Builds the regex for a complex segment
///
/// Parameters capture greedily, so with several candidate separators the
/// split happens at the last one (`{name}.{ext}` on `a.b.c` gives `a.b`/`c`).
fn compile_complex(segment: &str, parts: &[SegmentPart]) -> Result<Regex> {
    let body: String = parts
        .iter()
        .map(|part| match part {
            SegmentPart::Literal(literal) => regex::escape(literal),
            SegmentPart::Parameter(_) => "(.+)".to_string(),
        })
        .collect();

    RegexBuilder::new(&format!("^{}$", body))
        .case_insensitive(true)
        .build()
        .map_err(|e| complex_segment_error(segment, &e))
}

/// Literals are escaped, so only a regex size limit can reject the body
fn complex_segment_error(segment: &str, err: &regex::Error) -> RouteError {
    RouteError::InvalidPattern {
        pattern: segment.to_string(),
        reason: match err {
            regex::Error::CompiledTooBig(_) => "complex segment is too large to compile",
            _ => "complex segment does not compile",
        },
    }
}

/// Parses a route pattern into compiled segments
///
/// An empty pattern is valid and matches only the application root.
///
/// # Examples
///
/// ```
/// use mvc_router::route::parser::parse_pattern;
///
/// let parsed = parse_pattern("{controller}/{action}/{id}").unwrap();
/// assert_eq!(parsed.params, vec!["controller", "action", "id"]);
/// assert!(!parsed.has_catch_all);
///
/// let parsed = parse_pattern("docs/{*path}").unwrap();
/// assert!(parsed.has_catch_all);
///
/// assert!(parse_pattern("~/products").is_err());
/// ```
pub fn parse_pattern(pattern: &str) -> Result<ParsedPattern> {
    let invalid = |reason| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    if pattern.starts_with('~') || pattern.starts_with('/') {
        return Err(invalid("pattern must not start with '~' or '/'"));
    }
    if pattern.contains('?') {
        return Err(invalid("pattern must not contain '?'"));
    }
    if pattern.is_empty() {
        return Ok(ParseState::default().finish());
    }

    pattern
        .split('/')
        .try_fold(ParseState::default(), |state, segment| {
            state.with_segment(pattern, segment)
        })
        .map(ParseState::finish)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_pattern() {
        let parsed = parse_pattern("{controller}/{action}/{id}").unwrap();
        assert_eq!(parsed.segments.len(), 3);
        assert_eq!(parsed.params, vec!["controller", "action", "id"]);
        assert!(!parsed.has_catch_all);
    }

    #[test]
    fn test_parse_literal_and_params() {
        let parsed = parse_pattern("products/{id}").unwrap();
        assert!(matches!(&parsed.segments[0], Segment::Literal(l) if l == "products"));
        assert!(matches!(&parsed.segments[1], Segment::Parameter(p) if p == "id"));
        assert_eq!(parsed.params, vec!["id"]);
    }

    #[test]
    fn test_parse_empty_pattern() {
        let parsed = parse_pattern("").unwrap();
        assert!(parsed.segments.is_empty());
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn test_parse_catch_all() {
        let parsed = parse_pattern("{resource}.axd/{*pathInfo}").unwrap();
        assert!(parsed.has_catch_all);
        assert_eq!(parsed.params, vec!["resource", "pathInfo"]);
    }

    #[test]
    fn test_catch_all_must_be_last() {
        let err = parse_pattern("{*rest}/edit").unwrap_err();
        assert!(matches!(err, RouteError::CatchAllNotLast { .. }));
    }

    #[test]
    fn test_duplicate_parameter_ignores_case() {
        let err = parse_pattern("{id}/{ID}").unwrap_err();
        assert!(matches!(err, RouteError::DuplicateParameter { ref name, .. } if name == "ID"));
    }

    #[test]
    fn test_rejects_app_relative_prefix_and_query() {
        assert!(matches!(
            parse_pattern("~/home"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            parse_pattern("/home"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            parse_pattern("search?q={q}"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_segment() {
        assert!(matches!(
            parse_pattern("a//b"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_complex_segment_splits_at_last_separator() {
        let parsed = parse_pattern("{name}.{ext}").unwrap();
        let Segment::Complex { matcher, .. } = &parsed.segments[0] else {
            panic!("expected complex segment");
        };

        let caps = matcher.captures("archive.tar.gz").unwrap();
        assert_eq!(&caps[1], "archive.tar");
        assert_eq!(&caps[2], "gz");
    }

    #[test]
    fn test_complex_segment_escapes_literals() {
        let parsed = parse_pattern("{page}(+).aspx").unwrap();
        let Segment::Complex { matcher, .. } = &parsed.segments[0] else {
            panic!("expected complex segment");
        };

        assert_eq!(&matcher.captures("home(+).aspx").unwrap()[1], "home");
        assert!(!matcher.is_match("home(++).aspx"));
    }

    #[test]
    fn test_complex_segment_error_is_invalid_pattern() {
        let err = RegexBuilder::new("(").build().unwrap_err();
        assert_eq!(
            complex_segment_error("{a}(.x", &err),
            RouteError::InvalidPattern {
                pattern: "{a}(.x".to_string(),
                reason: "complex segment does not compile",
            }
        );

        let err = regex::Error::CompiledTooBig(10);
        assert!(matches!(
            complex_segment_error("{a}.x", &err),
            RouteError::InvalidPattern {
                reason: "complex segment is too large to compile",
                ..
            }
        ));
    }
}
