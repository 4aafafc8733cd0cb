//! Segment classification for MVC route patterns
//!
//! Pure parsing of one `/`-separated segment of a pattern such as
//! `{controller}/{action}/{id}` into a typed segment.

use crate::error::{Result, RouteError};

/// A piece of a segment: literal text or a `{parameter}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPart {
    Literal(String),
    Parameter(String),
}

/// Represents the different kinds of route pattern segments
///
/// # Examples
///
/// ```
/// use mvc_router::route::pattern::{classify_segment, PatternSegmentType};
///
/// // Literal segment
/// let seg = classify_segment("products").unwrap();
/// assert!(matches!(seg, PatternSegmentType::Literal(_)));
///
/// // Parameter
/// let seg = classify_segment("{id}").unwrap();
/// assert!(matches!(seg, PatternSegmentType::Parameter(_)));
///
/// // Catch-all
/// let seg = classify_segment("{*path}").unwrap();
/// assert!(matches!(seg, PatternSegmentType::CatchAll(_)));
///
/// // Literal and parameters mixed in one segment
/// let seg = classify_segment("{resource}.axd").unwrap();
/// assert!(matches!(seg, PatternSegmentType::Complex(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegmentType {
    /// Static text, matched case-insensitively
    Literal(String),
    /// `{name}`: consumes exactly one path segment
    Parameter(String),
    /// `{*name}`: consumes the rest of the path (possibly nothing)
    CatchAll(String),
    /// Literal text and parameters sharing one segment, e.g. `{name}.{ext}`
    Complex(Vec<SegmentPart>),
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules
///
/// 1. A segment made of a single `{*name}` is a catch-all
/// 2. A segment made of a single `{name}` is a parameter
/// 3. A segment without braces is a literal
/// 4. Anything else is complex; parameters in it must be separated by literals
pub fn classify_segment(segment: &str) -> Result<PatternSegmentType> {
    let parts = split_parts(segment)?;

    match parts.as_slice() {
        [SegmentPart::Parameter(name)] => match name.strip_prefix('*') {
            Some(catch_all) => {
                let catch_all = catch_all.trim();
                if catch_all.is_empty() {
                    return Err(RouteError::EmptyParameterName {
                        segment: segment.to_string(),
                    });
                }
                Ok(PatternSegmentType::CatchAll(catch_all.to_string()))
            }
            None => Ok(PatternSegmentType::Parameter(name.clone())),
        },
        [SegmentPart::Literal(literal)] => Ok(PatternSegmentType::Literal(literal.clone())),
        _ => {
            let has_catch_all = parts
                .iter()
                .any(|p| matches!(p, SegmentPart::Parameter(name) if name.starts_with('*')));

            if has_catch_all {
                return Err(RouteError::CatchAllInComplexSegment {
                    segment: segment.to_string(),
                });
            }
            Ok(PatternSegmentType::Complex(parts))
        }
    }
}

/// Splits a segment into literal and parameter parts
fn split_parts(segment: &str) -> Result<Vec<SegmentPart>> {
    let unbalanced = || RouteError::UnbalancedBraces {
        segment: segment.to_string(),
    };

    let mut parts = Vec::new();
    let mut rest = segment;

    while !rest.is_empty() {
        match rest.find('{') {
            Some(0) => {
                let close = rest.find('}').ok_or_else(unbalanced)?;
                let inner = &rest[1..close];
                if inner.contains('{') {
                    return Err(unbalanced());
                }

                let name = inner.trim();
                if name.is_empty() {
                    return Err(RouteError::EmptyParameterName {
                        segment: segment.to_string(),
                    });
                }
                if matches!(parts.last(), Some(SegmentPart::Parameter(_))) {
                    return Err(RouteError::AdjacentParameters {
                        segment: segment.to_string(),
                    });
                }

                parts.push(SegmentPart::Parameter(name.to_string()));
                rest = &rest[close + 1..];
            }
            Some(open) => {
                let literal = &rest[..open];
                if literal.contains('}') {
                    return Err(unbalanced());
                }
                parts.push(SegmentPart::Literal(literal.to_string()));
                rest = &rest[open..];
            }
            None => {
                if rest.contains('}') {
                    return Err(unbalanced());
                }
                parts.push(SegmentPart::Literal(rest.to_string()));
                rest = "";
            }
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_literal() {
        let seg = classify_segment("about").unwrap();
        assert_eq!(seg, PatternSegmentType::Literal("about".to_string()));
    }

    #[test]
    fn test_classify_parameter() {
        let seg = classify_segment("{id}").unwrap();
        assert_eq!(seg, PatternSegmentType::Parameter("id".to_string()));
    }

    #[test]
    fn test_classify_parameter_trims_whitespace() {
        let seg = classify_segment("{ id }").unwrap();
        assert_eq!(seg, PatternSegmentType::Parameter("id".to_string()));
    }

    #[test]
    fn test_classify_catch_all() {
        let seg = classify_segment("{*pathInfo}").unwrap();
        assert_eq!(seg, PatternSegmentType::CatchAll("pathInfo".to_string()));
    }

    #[test]
    fn test_classify_complex() {
        let seg = classify_segment("{resource}.axd").unwrap();
        assert_eq!(
            seg,
            PatternSegmentType::Complex(vec![
                SegmentPart::Parameter("resource".to_string()),
                SegmentPart::Literal(".axd".to_string()),
            ])
        );
    }

    #[test]
    fn test_classify_complex_two_params() {
        let seg = classify_segment("{name}.{ext}").unwrap();
        assert_eq!(
            seg,
            PatternSegmentType::Complex(vec![
                SegmentPart::Parameter("name".to_string()),
                SegmentPart::Literal(".".to_string()),
                SegmentPart::Parameter("ext".to_string()),
            ])
        );
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(matches!(
            classify_segment("{id"),
            Err(RouteError::UnbalancedBraces { .. })
        ));
        assert!(matches!(
            classify_segment("id}"),
            Err(RouteError::UnbalancedBraces { .. })
        ));
        assert!(matches!(
            classify_segment("{{id}"),
            Err(RouteError::UnbalancedBraces { .. })
        ));
    }

    #[test]
    fn test_empty_parameter_name() {
        assert!(matches!(
            classify_segment("{}"),
            Err(RouteError::EmptyParameterName { .. })
        ));
        assert!(matches!(
            classify_segment("{*}"),
            Err(RouteError::EmptyParameterName { .. })
        ));
    }

    #[test]
    fn test_adjacent_parameters() {
        assert!(matches!(
            classify_segment("{a}{b}"),
            Err(RouteError::AdjacentParameters { .. })
        ));
    }

    #[test]
    fn test_catch_all_in_complex_segment() {
        assert!(matches!(
            classify_segment("files-{*rest}"),
            Err(RouteError::CatchAllInComplexSegment { .. })
        ));
    }
}
