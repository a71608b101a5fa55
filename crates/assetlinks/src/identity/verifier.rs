//! App package verification against an origin's statement tree.

use log::{debug, info};

use crate::error::{AssetLinksError, Result};
use crate::grammar::{is_valid_package_name, parse_source_origin, RELATION_HANDLE_ALL_URLS};
use crate::matcher::{android_app_matcher, MatcherBinding};
use crate::statement::Target;
use crate::verify::{DocumentTransport, HttpTransport, SourceVerifier, TransportConfig};

use super::{Fingerprint, SigningInfoProvider};

/// Verifies app packages using the signing identities from `P`.
pub struct AppPackageVerifier<P, T = HttpTransport> {
    signing: P,
    verifier: SourceVerifier<T>,
}

impl<P: SigningInfoProvider> AppPackageVerifier<P, HttpTransport> {
    /// Fetch over HTTPS with the tighter app-verification timeouts.
    pub fn with_http(signing: P) -> Self {
        Self::new(
            signing,
            SourceVerifier::with_http(TransportConfig::app_verification()),
        )
    }
}

impl<P: SigningInfoProvider, T: DocumentTransport> AppPackageVerifier<P, T> {
    pub fn new(signing: P, verifier: SourceVerifier<T>) -> Self {
        Self { signing, verifier }
    }

    /// The underlying source verifier.
    pub fn source_verifier(&self) -> &SourceVerifier<T> {
        &self.verifier
    }

    /// Is `package_name` vouched for by `origin`?
    ///
    /// Returns `Ok(false)` when the statement tree was read but does not
    /// cover every required signer. Errors mean no conclusion was reached:
    /// [`AssetLinksError::InvalidInput`] for a malformed package name or
    /// origin, [`AssetLinksError::UnknownPrincipal`] when the
    /// package's signing identities are unavailable, and any source
    /// verification failure otherwise.
    ///
    /// Blocks on network I/O; see [`Self::cancel`].
    pub fn verify(&self, package_name: &str, origin: &str) -> Result<bool> {
        if !is_valid_package_name(package_name) {
            return Err(AssetLinksError::InvalidInput(format!(
                "package name '{package_name}' is not valid"
            )));
        }
        let origin = parse_source_origin(origin)?;

        let principal = self
            .signing
            .fingerprints(package_name)
            .ok_or_else(|| AssetLinksError::UnknownPrincipal(package_name.to_string()))?;
        if principal.is_empty() {
            return Err(AssetLinksError::UnknownPrincipal(format!(
                "{package_name} has no signing certificates"
            )));
        }

        let mut satisfied = vec![false; principal.required_slots()];
        let matcher = android_app_matcher(Some(RELATION_HANDLE_ALL_URLS), package_name, None)?;
        let binding = MatcherBinding::new(matcher, |_, statement| {
            let Target::AndroidApp {
                sha256_cert_fingerprints,
                ..
            } = &statement.target
            else {
                return Ok(());
            };
            for published in sha256_cert_fingerprints {
                let published = Fingerprint::parse(published)?;
                if let Some(slot) = principal.slot_for(&published) {
                    debug!("{package_name}: signer slot {slot} vouched for by {published}");
                    satisfied[slot] = true;
                }
            }
            Ok(())
        });

        self.verifier.verify_origin(&origin, vec![binding])?;

        let verified = satisfied.iter().all(|s| *s);
        info!("{package_name} verified against {origin}: {verified}");
        Ok(verified)
    }

    /// Cancel a running [`Self::verify`] from another thread.
    pub fn cancel(&self) {
        self.verifier.cancel();
    }
}
