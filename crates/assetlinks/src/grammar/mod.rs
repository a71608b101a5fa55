//! Statement-list grammar: constants and syntax predicates.
//!
//! The grammar module provides:
//! - JSON key names and well-known relation strings
//! - Syntax checks for relations, package names, and certificate fingerprints
//! - The valid-web-origin predicate and origin canonicalization
//! - Derivation of the well-known statement-list URI

pub mod origin;
pub mod syntax;

pub use origin::{
    canonicalize, canonicalize_str, is_valid_web_origin, parse_source_origin, same_origin,
    well_known_uri,
};
pub use syntax::{is_valid_fingerprint, is_valid_package_name, is_valid_relation};

/// 1 source URI + max 10 include statements.
pub const MAX_ASSET_LINKS_URIS: usize = 11;

/// Path of the statement list relative to an origin.
pub const WELL_KNOWN_PATH: &str = "/.well-known/assetlinks.json";

pub const INCLUDE: &str = "include";
pub const RELATION: &str = "relation";
pub const TARGET: &str = "target";
pub const NAMESPACE: &str = "namespace";

pub const RELATION_HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";
pub const RELATION_GET_LOGIN_CREDS: &str = "delegate_permission/common.get_login_creds";

pub const NAMESPACE_WEB: &str = "web";
pub const WEB_SITE: &str = "site";

pub const NAMESPACE_ANDROID_APP: &str = "android_app";
pub const ANDROID_APP_PACKAGE_NAME: &str = "package_name";
pub const ANDROID_APP_SHA256_CERT_FINGERPRINTS: &str = "sha256_cert_fingerprints";

/// Media type statement lists are expected to be served with.
pub const CONTENT_TYPE_JSON: &str = "application/json";
