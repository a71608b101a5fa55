//! Target field conditions.

use serde_json::Value;
use url::Url;

use crate::grammar::{canonicalize, canonicalize_str};

/// A condition on one field of a statement target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCondition {
    /// The field is a string equal to this value.
    Exact(String),
    /// The field is an array containing this value, or a scalar whose
    /// string form equals it.
    Contains(String),
    /// The field is a URI canonically equal to this one.
    Uri(Url),
}

impl FieldCondition {
    /// URI condition, stored in canonical form.
    pub fn uri(url: &Url) -> Self {
        Self::Uri(canonicalize(url))
    }

    /// Test a target field value against this condition.
    ///
    /// A value that does not parse as a URI simply fails a URI condition;
    /// matching is not a syntax validator.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Exact(expected) => value.as_str() == Some(expected.as_str()),
            Self::Contains(expected) => match value {
                Value::Array(items) => items.iter().any(|item| string_form(item) == *expected),
                scalar => string_form(scalar) == *expected,
            },
            Self::Uri(expected) => value
                .as_str()
                .and_then(canonicalize_str)
                .is_some_and(|actual| actual == canonicalize(expected)),
        }
    }
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
