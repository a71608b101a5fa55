//! Web origins: validation, canonicalization, and well-known URI derivation.
//!
//! Two origins are the same when their canonical forms are equal. The
//! canonical form elides an explicit default port (80 for http, 443 for
//! https) and the trailing `.`s of a domain host, so `a.com.` and `a.com..`
//! both name `a.com`.

use url::{Host, Url};

use crate::error::{AssetLinksError, Result};

use super::WELL_KNOWN_PATH;

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

fn is_web_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

// `Url` quietly turns `https:host` into `https://host/`, so hierarchy is
// checked on the raw text.
fn has_authority(raw: &str) -> bool {
    raw.trim()
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"))
}

/// Parse a caller-supplied source origin.
///
/// The origin must be absolute, hierarchical, and use http or https.
/// Any path, query, or fragment is accepted here and discarded later by
/// [`well_known_uri`].
pub fn parse_source_origin(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        AssetLinksError::InvalidInput(format!("source URI '{raw}' is not absolute: {e}"))
    })?;
    if !has_authority(raw) || url.cannot_be_a_base() || !url.has_host() {
        return Err(AssetLinksError::InvalidInput(format!(
            "source URI '{raw}' must be absolute and hierarchical"
        )));
    }
    if !is_web_scheme(url.scheme()) {
        return Err(AssetLinksError::InvalidInput(format!(
            "source URI '{raw}' must be HTTP or HTTPS"
        )));
    }
    Ok(url)
}

/// Derive the well-known statement-list URI for an origin.
///
/// Scheme and authority are preserved; path, query, and fragment are
/// replaced. `https://www.example.com:8443/foo?q#f` becomes
/// `https://www.example.com:8443/.well-known/assetlinks.json`.
pub fn well_known_uri(origin: &Url) -> Result<Url> {
    if origin.cannot_be_a_base() || !origin.has_host() {
        return Err(AssetLinksError::InvalidInput(format!(
            "source URI '{origin}' must be absolute and hierarchical"
        )));
    }
    if !is_web_scheme(origin.scheme()) {
        return Err(AssetLinksError::InvalidInput(format!(
            "source URI '{origin}' must be HTTP or HTTPS"
        )));
    }
    let mut uri = origin.clone();
    uri.set_path(WELL_KNOWN_PATH);
    uri.set_query(None);
    uri.set_fragment(None);
    Ok(uri)
}

/// Is `raw` a valid web origin for use as a statement source or web target?
///
/// True iff absolute, http/https, and userinfo, path, query, and fragment
/// are all empty or absent, with any explicit port in `1..=65535`.
pub fn is_valid_web_origin(raw: &str) -> bool {
    let Ok(url) = parse_source_origin(raw) else {
        return false;
    };
    url.username().is_empty()
        && url.password().is_none()
        && matches!(url.path(), "" | "/")
        && url.query().map_or(true, str::is_empty)
        && url.fragment().map_or(true, str::is_empty)
        && url.port() != Some(0)
}

/// Canonicalize a URI for equality comparison.
///
/// Idempotent: `canonicalize(&canonicalize(u)) == canonicalize(u)`.
pub fn canonicalize(url: &Url) -> Url {
    let mut out = url.clone();
    if out.port().is_some() && out.port() == default_port(out.scheme()) {
        // Only fails for cannot-be-a-base URLs, which have no port anyway.
        let _ = out.set_port(None);
    }
    if let Some(Host::Domain(host)) = url.host() {
        let trimmed = host.trim_end_matches('.');
        if !trimmed.is_empty() && trimmed.len() < host.len() {
            // A host `Url` accepted once stays acceptable without its dots.
            let _ = out.set_host(Some(trimmed));
        }
    }
    out
}

/// Parse and canonicalize; `None` when `raw` is not an absolute URI.
pub fn canonicalize_str(raw: &str) -> Option<Url> {
    Url::parse(raw).ok().map(|u| canonicalize(&u))
}

/// Compare two URIs by canonical form.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    canonicalize(a) == canonicalize(b)
}
