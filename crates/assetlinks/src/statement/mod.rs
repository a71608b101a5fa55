//! Statement model: typed view of statement-list documents.
//!
//! A statement-list document is a JSON array whose elements are either
//! include directives (`{"include": "<uri>"}`) or relation statements
//! (`{"relation": [...], "target": {...}}`). Each element is classified
//! once, during a single structural-validation pass, into a
//! [`StatementListEntry`]; relation targets are further classified into a
//! [`Target`] variant by namespace.

pub mod list;
pub mod target;

pub use list::{parse_statement_list, StatementListEntry};
pub use target::Target;

use serde_json::{Map, Value};

use crate::error::{AssetLinksError, Result};
use crate::grammar::{self, is_valid_relation};

/// A validated relation statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationStatement {
    /// Non-empty list of relation strings.
    pub relations: Vec<String>,
    /// The classified target.
    pub target: Target,
    /// The target object as published, for field-level matching.
    target_fields: Map<String, Value>,
}

impl RelationStatement {
    /// Validate a JSON statement object and build a typed statement.
    ///
    /// Fails with [`AssetLinksError::IllFormedStatement`] when the relation
    /// list is missing, empty, or syntactically invalid, or when the target
    /// is missing or does not satisfy its namespace's grammar.
    pub fn from_json(statement: &Map<String, Value>) -> Result<Self> {
        let relations = match statement.get(grammar::RELATION) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ill_formed("relation must be an array")),
            None => return Err(ill_formed("statement has no relation")),
        };
        if relations.is_empty() {
            return Err(ill_formed("relation array must contain at least one relation"));
        }
        let relations = relations
            .iter()
            .map(|r| match r.as_str() {
                Some(s) if is_valid_relation(s) => Ok(s.to_string()),
                Some(s) => Err(ill_formed(&format!("invalid relation '{s}'"))),
                None => Err(ill_formed("relation entries must be strings")),
            })
            .collect::<Result<Vec<_>>>()?;

        let target_fields = match statement.get(grammar::TARGET) {
            Some(Value::Object(fields)) => fields.clone(),
            Some(_) => return Err(ill_formed("target must be an object")),
            None => return Err(ill_formed("relation statement has no target")),
        };
        let target = Target::from_json(&target_fields)?;

        Ok(Self {
            relations,
            target,
            target_fields,
        })
    }

    /// Does the statement assert `relation`?
    pub fn has_relation(&self, relation: &str) -> bool {
        self.relations.iter().any(|r| r == relation)
    }

    /// A raw field of the target object.
    pub fn target_field(&self, key: &str) -> Option<&Value> {
        self.target_fields.get(key)
    }

    /// The target's namespace string.
    pub fn namespace(&self) -> &str {
        self.target.namespace()
    }
}

pub(crate) fn ill_formed(reason: &str) -> AssetLinksError {
    AssetLinksError::IllFormedStatement(reason.to_string())
}
