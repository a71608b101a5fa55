//! Statement queries: list what a source asserts, or check one assertion.
//!
//! These are the two request shapes of the Digital Asset Links API,
//! answered by walking the source's statement tree locally.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AssetLinksError, Result};
use crate::grammar::{is_valid_relation, is_valid_web_origin};
use crate::matcher::{android_app_matcher, web_site_matcher, MatcherBinding, StatementMatcher};
use crate::statement::{RelationStatement, Target};
use crate::verify::{DocumentTransport, SourceVerifier};

/// A statement target in query form. App targets carry one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "namespace", rename_all = "snake_case")]
pub enum Asset {
    Web {
        site: String,
    },
    AndroidApp {
        package_name: String,
        sha256_fingerprint: String,
    },
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web { site } => write!(f, "web {site}"),
            Self::AndroidApp {
                package_name,
                sha256_fingerprint,
            } => write!(f, "android_app {package_name} {sha256_fingerprint}"),
        }
    }
}

/// One (relation, target) assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub relation: String,
    pub target: Asset,
}

/// Result of [`list_statements`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementListing {
    /// Statements in document order.
    pub statements: Vec<Statement>,
    /// Whether any non-fatal warning occurred while walking the tree.
    pub had_warnings: bool,
    /// Number of documents in the statement tree.
    pub document_count: usize,
    /// When the walk completed.
    pub verified_at: DateTime<Utc>,
}

/// List every statement `source` asserts, optionally filtered by relation.
///
/// A statement with several relations yields one entry per relation, and
/// an app target with several fingerprints one entry per fingerprint.
/// Targets in unrecognized namespaces are not listed.
pub fn list_statements<T: DocumentTransport>(
    verifier: &SourceVerifier<T>,
    source: &str,
    relation: Option<&str>,
) -> Result<StatementListing> {
    check_source(source)?;
    let matcher = StatementMatcher::new(relation, None, std::iter::empty())?;

    let mut statements = Vec::new();
    let binding = MatcherBinding::new(matcher, |_, statement| {
        flatten(statement, relation, &mut statements);
        Ok(())
    });
    let report = verifier.verify(source, vec![binding])?;

    Ok(StatementListing {
        statements,
        had_warnings: report.had_warnings,
        document_count: report.document_uris.len(),
        verified_at: report.verified_at,
    })
}

/// Does `source` assert `relation` towards `target`?
///
/// Web targets compare by canonical origin; app targets match on package
/// name and membership of the fingerprint in the published list.
pub fn check_statement<T: DocumentTransport>(
    verifier: &SourceVerifier<T>,
    source: &str,
    relation: &str,
    target: &Asset,
) -> Result<bool> {
    check_source(source)?;
    if !is_valid_relation(relation) {
        return Err(AssetLinksError::InvalidInput(format!(
            "relation '{relation}' is not valid"
        )));
    }
    let matcher = match target {
        Asset::Web { site } => web_site_matcher(Some(relation), site)?,
        Asset::AndroidApp {
            package_name,
            sha256_fingerprint,
        } => android_app_matcher(Some(relation), package_name, Some(sha256_fingerprint))?,
    };

    let mut linked = false;
    let binding = MatcherBinding::new(matcher, |_, _| {
        linked = true;
        Ok(())
    });
    verifier.verify(source, vec![binding])?;
    Ok(linked)
}

fn check_source(source: &str) -> Result<()> {
    if is_valid_web_origin(source) {
        Ok(())
    } else {
        Err(AssetLinksError::InvalidInput(format!(
            "source '{source}' is not a valid web origin"
        )))
    }
}

fn flatten(statement: &RelationStatement, relation: Option<&str>, out: &mut Vec<Statement>) {
    let relations = statement
        .relations
        .iter()
        .filter(|r| relation.map_or(true, |wanted| wanted == r.as_str()));
    for r in relations {
        match &statement.target {
            Target::Web { site } => out.push(Statement {
                relation: r.clone(),
                target: Asset::Web { site: site.clone() },
            }),
            Target::AndroidApp {
                package_name,
                sha256_cert_fingerprints,
            } => out.extend(sha256_cert_fingerprints.iter().map(|fp| Statement {
                relation: r.clone(),
                target: Asset::AndroidApp {
                    package_name: package_name.clone(),
                    sha256_fingerprint: fp.clone(),
                },
            })),
            Target::Unrecognized { namespace } => {
                debug!("not listing target in unrecognized namespace '{namespace}'");
            }
        }
    }
}
