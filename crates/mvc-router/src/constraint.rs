//! Route constraints
//!
//! Parameter constraints are regular expressions matched against the whole
//! value, case-insensitively. A few names are accepted as shorthands for
//! common patterns (`int`, `alpha`, `alphanum`, `slug`, `uuid`); anything
//! else is compiled as a regex.
//!
//! The HTTP method constraint restricts which verbs a route answers to.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RouteError};

/// Whole-value regex constraint on a route parameter
///
/// # Examples
///
/// ```
/// use mvc_router::ParameterConstraint;
///
/// let int = ParameterConstraint::parse("id", "int").unwrap();
/// assert!(int.validate("123"));
/// assert!(!int.validate("12a"));
///
/// let year = ParameterConstraint::parse("year", r"\d{4}").unwrap();
/// assert!(year.validate("2024"));
/// assert!(!year.validate("24"));
/// ```
#[derive(Debug, Clone)]
pub struct ParameterConstraint {
    source: String,
    matcher: Regex,
}

impl ParameterConstraint {
    /// Compiles a constraint for parameter `name`
    pub fn parse(name: &str, pattern: &str) -> Result<Self> {
        let source = match pattern {
            "int" => r"-?\d+",
            "alpha" => "[a-z]+",
            "alphanum" => "[a-z0-9]+",
            "slug" => "[a-z0-9]+(?:-[a-z0-9]+)*",
            "uuid" => "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
            other => other,
        };

        let matcher = RegexBuilder::new(&format!("^(?:{})$", source))
            .case_insensitive(true)
            .build()
            .map_err(|e| RouteError::InvalidConstraint {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    pub fn validate(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }
}

impl PartialEq for ParameterConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Allowed HTTP methods for a route (upper-cased)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpMethodConstraint {
    methods: Vec<String>,
}

impl HttpMethodConstraint {
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            methods: methods
                .into_iter()
                .map(|m| m.as_ref().trim().to_ascii_uppercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("int", "42", true)]
    #[case("int", "-7", true)]
    #[case("int", "4x", false)]
    #[case("alpha", "Books", true)]
    #[case("alpha", "b00ks", false)]
    #[case("alphanum", "b00ks", true)]
    #[case("slug", "hello-world", true)]
    #[case("slug", "hello--world", false)]
    #[case("uuid", "550E8400-e29b-41d4-a716-446655440000", true)]
    #[case("uuid", "not-a-uuid", false)]
    fn test_shorthand_constraints(#[case] pattern: &str, #[case] value: &str, #[case] expected: bool) {
        let constraint = ParameterConstraint::parse("p", pattern).unwrap();
        assert_eq!(constraint.validate(value), expected);
    }

    #[test]
    fn test_regex_constraint_is_anchored() {
        let constraint = ParameterConstraint::parse("id", r"\d+").unwrap();
        assert!(constraint.validate("5"));
        assert!(!constraint.validate("a5"));
        assert!(!constraint.validate("5a"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let constraint = ParameterConstraint::parse("action", "index|list").unwrap();
        assert!(constraint.validate("LIST"));
        assert!(!constraint.validate("indexes"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = ParameterConstraint::parse("id", r"(\d+").unwrap_err();
        assert!(matches!(err, RouteError::InvalidConstraint { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_method_constraint() {
        let methods = HttpMethodConstraint::new(["get", " Head "]);
        assert_eq!(methods.methods(), &["GET".to_string(), "HEAD".to_string()]);
        assert!(methods.allows("GET"));
        assert!(methods.allows("head"));
        assert!(!methods.allows("POST"));
    }
}
