//! Regex-backed syntax checks for statement fields.

use std::sync::OnceLock;

use regex::Regex;

const RELATION_PATTERN: &str = r"^[a-z0-9_.]+/[a-z0-9_.]+$";
const PACKAGE_NAME_PATTERN: &str = r"^(?:[A-Za-z0-9_]+\.)+[A-Za-z0-9_]+$";
const FINGERPRINT_PATTERN: &str = r"^(?:[0-9A-F]{2}:){31}[0-9A-F]{2}$";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex"))
}

/// Check a relation string, e.g. `delegate_permission/common.handle_all_urls`.
pub fn is_valid_relation(relation: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, RELATION_PATTERN).is_match(relation)
}

/// Check an android app package name, e.g. `com.example.app`.
pub fn is_valid_package_name(package_name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, PACKAGE_NAME_PATTERN).is_match(package_name)
}

/// Check a SHA-256 certificate fingerprint: 32 uppercase hex pairs joined by `:`.
pub fn is_valid_fingerprint(fingerprint: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, FINGERPRINT_PATTERN).is_match(fingerprint)
}
