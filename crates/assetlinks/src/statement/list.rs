//! Statement-list documents: structural validation of one document.

use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::grammar;

use super::{ill_formed, RelationStatement};

/// One classified element of a statement-list document.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementListEntry {
    /// An include directive, resolved against the containing document.
    Include(Url),
    /// A validated relation statement.
    Relation(RelationStatement),
    /// An object with none of the recognized keys; skipped with a warning.
    Unrecognized,
}

/// Parse and classify a statement-list document.
///
/// Any structural error anywhere in the document fails the whole document
/// with [`crate::AssetLinksError::IllFormedStatement`].
pub fn parse_statement_list(document_uri: &Url, content: &str) -> Result<Vec<StatementListEntry>> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| ill_formed(&format!("error while parsing statement list JSON: {e}")))?;
    let Value::Array(elements) = document else {
        return Err(ill_formed("statement list must be a JSON array"));
    };

    elements
        .iter()
        .map(|element| classify(document_uri, element))
        .collect()
}

fn classify(document_uri: &Url, element: &Value) -> Result<StatementListEntry> {
    let Value::Object(statement) = element else {
        return Err(ill_formed("statement list elements must be objects"));
    };

    let has_relation = statement.contains_key(grammar::RELATION);
    let has_target = statement.contains_key(grammar::TARGET);

    if let Some(include) = statement.get(grammar::INCLUDE) {
        if has_relation || has_target {
            return Err(ill_formed(
                "include statement must not contain relation or target",
            ));
        }
        let Some(raw) = include.as_str() else {
            return Err(ill_formed("include must be a string"));
        };
        return resolve_include(document_uri, raw).map(StatementListEntry::Include);
    }

    if has_relation {
        return RelationStatement::from_json(statement).map(StatementListEntry::Relation);
    }

    if has_target {
        return Err(ill_formed("statement has a target but no relation"));
    }

    Ok(StatementListEntry::Unrecognized)
}

fn resolve_include(document_uri: &Url, raw: &str) -> Result<Url> {
    let resolved = match Url::parse(raw) {
        Ok(uri) => uri,
        Err(url::ParseError::RelativeUrlWithoutBase) => document_uri.join(raw).map_err(|e| {
            ill_formed(&format!(
                "include '{raw}' not resolvable against {document_uri}: {e}"
            ))
        })?,
        Err(e) => return Err(ill_formed(&format!("include '{raw}' is not a URI: {e}"))),
    };
    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(ill_formed(&format!(
            "include '{resolved}' has unsupported scheme '{other}'"
        ))),
    }
}
