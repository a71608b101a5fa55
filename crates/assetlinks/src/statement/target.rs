//! Statement targets, classified by namespace.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::grammar::{self, is_valid_fingerprint, is_valid_package_name, is_valid_web_origin};

use super::ill_formed;

/// The target of a relation statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `namespace = "web"`.
    Web { site: String },
    /// `namespace = "android_app"`.
    AndroidApp {
        package_name: String,
        sha256_cert_fingerprints: Vec<String>,
    },
    /// Any other namespace; carried through but never validated further.
    Unrecognized { namespace: String },
}

impl Target {
    /// Classify and validate a target object.
    pub fn from_json(target: &Map<String, Value>) -> Result<Self> {
        let namespace = match target.get(grammar::NAMESPACE) {
            Some(Value::String(ns)) => ns.as_str(),
            Some(_) => return Err(ill_formed("target namespace must be a string")),
            None => return Err(ill_formed("target must contain namespace")),
        };

        match namespace {
            grammar::NAMESPACE_WEB => {
                let site = required_str(target, grammar::WEB_SITE)?;
                if !is_valid_web_origin(site) {
                    return Err(ill_formed(&format!("web target site '{site}' is not a valid origin")));
                }
                Ok(Self::Web {
                    site: site.to_string(),
                })
            }
            grammar::NAMESPACE_ANDROID_APP => {
                let package_name = required_str(target, grammar::ANDROID_APP_PACKAGE_NAME)?;
                if !is_valid_package_name(package_name) {
                    return Err(ill_formed(&format!(
                        "android_app package_name '{package_name}' is not valid"
                    )));
                }
                let fingerprints = match target.get(grammar::ANDROID_APP_SHA256_CERT_FINGERPRINTS) {
                    Some(Value::Array(items)) if !items.is_empty() => items,
                    Some(_) => {
                        return Err(ill_formed(
                            "sha256_cert_fingerprints must be a non-empty array",
                        ))
                    }
                    None => return Err(ill_formed("android_app target has no sha256_cert_fingerprints")),
                };
                let sha256_cert_fingerprints = fingerprints
                    .iter()
                    .map(|fp| match fp.as_str() {
                        Some(s) if is_valid_fingerprint(s) => Ok(s.to_string()),
                        _ => Err(ill_formed(&format!("invalid certificate fingerprint {fp}"))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::AndroidApp {
                    package_name: package_name.to_string(),
                    sha256_cert_fingerprints,
                })
            }
            other => Ok(Self::Unrecognized {
                namespace: other.to_string(),
            }),
        }
    }

    /// The namespace string this target was published under.
    pub fn namespace(&self) -> &str {
        match self {
            Self::Web { .. } => grammar::NAMESPACE_WEB,
            Self::AndroidApp { .. } => grammar::NAMESPACE_ANDROID_APP,
            Self::Unrecognized { namespace } => namespace,
        }
    }
}

fn required_str<'a>(target: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    match target.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ill_formed(&format!("target field '{key}' must be a string"))),
        None => Err(ill_formed(&format!("target has no '{key}'"))),
    }
}
