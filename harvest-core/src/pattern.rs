//! Regular-expression patterns with an out-of-band case flag.
//!
//! The case flag is never embedded as an inline `(?i)` group; it is applied
//! through [`RegexBuilder`] at compile time, so two patterns with the same
//! expression but different flags are distinct cache keys.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HarvestError, Result};

/// An immutable expression + case-sensitivity pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    expression: String,
    #[serde(default)]
    case_insensitive: bool,
}

impl Pattern {
    /// A case-sensitive pattern.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            case_insensitive: false,
        }
    }

    /// A pattern with an explicit case flag.
    #[must_use]
    pub fn with_case(expression: impl Into<String>, case_insensitive: bool) -> Self {
        Self {
            expression: expression.into(),
            case_insensitive,
        }
    }

    /// A case-insensitive pattern.
    #[must_use]
    pub fn ignore_case(expression: impl Into<String>) -> Self {
        Self::with_case(expression, true)
    }

    /// The raw expression.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether matching ignores case.
    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Compile the expression. Pure: the same pattern always yields an
    /// equivalent regex, so results may be cached by the pattern itself.
    ///
    /// # Errors
    /// Returns [`HarvestError::InvalidPattern`] if the expression does not parse.
    pub fn compile(&self) -> Result<Arc<Regex>> {
        debug!(
            expression = %self.expression,
            case_insensitive = self.case_insensitive,
            "Compiling pattern"
        );
        RegexBuilder::new(&self.expression)
            .case_insensitive(self.case_insensitive)
            .build()
            .map(Arc::new)
            .map_err(|e| HarvestError::InvalidPattern {
                expression: self.expression.clone(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.case_insensitive {
            write!(f, "/{}/i", self.expression)
        } else {
            write!(f, "/{}/", self.expression)
        }
    }
}

impl From<&str> for Pattern {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_flag_is_applied_out_of_band() {
        let sensitive = Pattern::new("abc").compile().expect("compiles");
        let insensitive = Pattern::ignore_case("abc").compile().expect("compiles");

        assert!(!sensitive.is_match("ABC"));
        assert!(insensitive.is_match("ABC"));
    }

    #[test]
    fn invalid_expression_reports_pattern() {
        let err = Pattern::new("(unclosed").compile().expect_err("must fail");
        match err {
            HarvestError::InvalidPattern { expression, .. } => assert_eq!(expression, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn flag_is_part_of_identity() {
        assert_ne!(Pattern::new("x"), Pattern::ignore_case("x"));
        assert_eq!(Pattern::from("x"), Pattern::with_case("x", false));
        assert_eq!(Pattern::ignore_case("x").to_string(), "/x/i");
    }
}
