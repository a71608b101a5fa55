//! Statement matching: immutable predicates over relation statements.
//!
//! A [`StatementMatcher`] combines up to three conditions:
//! - a relation that must appear in the statement's relation list
//! - a target namespace that must equal the target's namespace
//! - per-field target conditions (exact, array-membership, or URI)
//!
//! Matchers are paired with callbacks in a [`MatcherBinding`]; the parser
//! invokes the callback for every statement the matcher accepts.

pub mod binding;
pub mod condition;

pub use binding::{MatchCallback, MatcherBinding};
pub use condition::FieldCondition;

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{AssetLinksError, Result};
use crate::grammar::{
    self, is_valid_fingerprint, is_valid_package_name, is_valid_relation, is_valid_web_origin,
};
use crate::statement::RelationStatement;

/// A predicate evaluated against one relation statement.
///
/// Two matchers are equal iff relation, namespace, and field conditions
/// are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementMatcher {
    relation: Option<String>,
    namespace: Option<String>,
    fields: BTreeMap<String, FieldCondition>,
}

impl StatementMatcher {
    /// Build a matcher from its conditions.
    ///
    /// A relation condition must satisfy the relation grammar. A later
    /// condition on the same field replaces an earlier one.
    pub fn new(
        relation: Option<&str>,
        namespace: Option<&str>,
        fields: impl IntoIterator<Item = (String, FieldCondition)>,
    ) -> Result<Self> {
        if let Some(r) = relation {
            if !is_valid_relation(r) {
                return Err(AssetLinksError::InvalidInput(format!(
                    "relation '{r}' is not valid"
                )));
            }
        }
        Ok(Self {
            relation: relation.map(str::to_string),
            namespace: namespace.map(str::to_string),
            fields: fields.into_iter().collect(),
        })
    }

    /// A matcher with no conditions; accepts every relation statement.
    pub fn any() -> Self {
        Self::default()
    }

    /// The relation condition, if any.
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    /// The namespace condition, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The field conditions, ordered by field name.
    pub fn fields(&self) -> &BTreeMap<String, FieldCondition> {
        &self.fields
    }

    /// Evaluate against a validated statement.
    pub fn compare(&self, statement: &RelationStatement) -> bool {
        if let Some(relation) = &self.relation {
            if !statement.has_relation(relation) {
                return false;
            }
        }
        self.matches_target(Some(statement.namespace()), |key| {
            statement.target_field(key)
        })
    }

    /// Evaluate against a raw JSON statement object.
    ///
    /// Returns [`AssetLinksError::MatcherInput`] when a field this matcher
    /// needs is missing entirely or has the wrong JSON type. An empty
    /// relation list never matches a relation condition.
    pub fn compare_json(&self, statement: &Value) -> Result<bool> {
        let Value::Object(statement) = statement else {
            return Err(matcher_input("statement is not an object"));
        };

        if let Some(relation) = &self.relation {
            let Some(Value::Array(relations)) = statement.get(grammar::RELATION) else {
                return Err(matcher_input("statement has no relation array"));
            };
            let mut matched = false;
            for r in relations {
                let r = r
                    .as_str()
                    .ok_or_else(|| matcher_input("relation entries must be strings"))?;
                matched |= r == relation.as_str();
            }
            if !matched {
                return Ok(false);
            }
        }

        if self.namespace.is_none() && self.fields.is_empty() {
            return Ok(true);
        }

        let Some(Value::Object(target)) = statement.get(grammar::TARGET) else {
            return Err(matcher_input("statement has no target object"));
        };
        let namespace = target.get(grammar::NAMESPACE).and_then(Value::as_str);
        if self.namespace.is_some() && namespace.is_none() {
            return Err(matcher_input("target has no namespace"));
        }
        Ok(self.matches_target(namespace, |key| lookup(target, key)))
    }

    fn matches_target<'v>(
        &self,
        namespace: Option<&str>,
        field: impl Fn(&str) -> Option<&'v Value>,
    ) -> bool {
        if let Some(expected) = &self.namespace {
            if namespace != Some(expected.as_str()) {
                return false;
            }
        }
        self.fields
            .iter()
            .all(|(key, condition)| field(key).is_some_and(|value| condition.matches(value)))
    }
}

fn lookup<'v>(target: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    target.get(key)
}

fn matcher_input(reason: &str) -> AssetLinksError {
    AssetLinksError::MatcherInput(reason.to_string())
}

/// Matcher for a web target whose site is canonically equal to `site`.
pub fn web_site_matcher(relation: Option<&str>, site: &str) -> Result<StatementMatcher> {
    if !is_valid_web_origin(site) {
        return Err(AssetLinksError::InvalidInput(format!(
            "web site '{site}' is not a valid origin"
        )));
    }
    let site = Url::parse(site)
        .map_err(|e| AssetLinksError::InvalidInput(format!("web site '{site}': {e}")))?;
    StatementMatcher::new(
        relation,
        Some(grammar::NAMESPACE_WEB),
        [(grammar::WEB_SITE.to_string(), FieldCondition::uri(&site))],
    )
}

/// Matcher for an android app target with `package_name`.
///
/// With a fingerprint, the target's fingerprint list must contain it.
pub fn android_app_matcher(
    relation: Option<&str>,
    package_name: &str,
    fingerprint: Option<&str>,
) -> Result<StatementMatcher> {
    if !is_valid_package_name(package_name) {
        return Err(AssetLinksError::InvalidInput(format!(
            "package name '{package_name}' is not valid"
        )));
    }
    let mut fields = vec![(
        grammar::ANDROID_APP_PACKAGE_NAME.to_string(),
        FieldCondition::Exact(package_name.to_string()),
    )];
    if let Some(fp) = fingerprint {
        if !is_valid_fingerprint(fp) {
            return Err(AssetLinksError::InvalidInput(format!(
                "certificate fingerprint '{fp}' is not valid"
            )));
        }
        fields.push((
            grammar::ANDROID_APP_SHA256_CERT_FINGERPRINTS.to_string(),
            FieldCondition::Contains(fp.to_string()),
        ));
    }
    StatementMatcher::new(relation, Some(grammar::NAMESPACE_ANDROID_APP), fields)
}
