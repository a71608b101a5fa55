//! Signing identities of app packages.

use std::collections::HashMap;

use super::Fingerprint;

/// The fingerprints a package must be vouched for with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalFingerprints {
    /// One signing identity. Any fingerprint from its rotation history,
    /// current or past, satisfies verification.
    SingleSigner { history: Vec<Fingerprint> },
    /// Several independent signing identities. Each current fingerprint
    /// must be published.
    MultipleSigners { current: Vec<Fingerprint> },
}

impl PrincipalFingerprints {
    /// Fingerprints of a single signer's DER certificates, current first.
    pub fn single_signer_from_der<C: AsRef<[u8]>>(history: &[C]) -> Self {
        Self::SingleSigner {
            history: history
                .iter()
                .map(|der| Fingerprint::of_der_certificate(der.as_ref()))
                .collect(),
        }
    }

    /// Fingerprints of several signers' DER certificates.
    pub fn multiple_signers_from_der<C: AsRef<[u8]>>(current: &[C]) -> Self {
        Self::MultipleSigners {
            current: current
                .iter()
                .map(|der| Fingerprint::of_der_certificate(der.as_ref()))
                .collect(),
        }
    }

    /// Number of independently satisfied slots verification requires.
    pub fn required_slots(&self) -> usize {
        match self {
            Self::SingleSigner { .. } => 1,
            Self::MultipleSigners { current } => current.len(),
        }
    }

    /// The slot a published fingerprint satisfies, if any.
    pub fn slot_for(&self, published: &Fingerprint) -> Option<usize> {
        match self {
            Self::SingleSigner { history } => history.contains(published).then_some(0),
            Self::MultipleSigners { current } => current.iter().position(|fp| fp == published),
        }
    }

    /// No fingerprints at all: such a principal can never be verified.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::SingleSigner { history } => history.is_empty(),
            Self::MultipleSigners { current } => current.is_empty(),
        }
    }
}

/// Looks up the signing identities of installed packages.
pub trait SigningInfoProvider {
    /// `None` when the package is unknown.
    fn fingerprints(&self, package_name: &str) -> Option<PrincipalFingerprints>;
}

impl<P: SigningInfoProvider + ?Sized> SigningInfoProvider for &P {
    fn fingerprints(&self, package_name: &str) -> Option<PrincipalFingerprints> {
        (**self).fingerprints(package_name)
    }
}

/// In-memory [`SigningInfoProvider`].
#[derive(Debug, Clone, Default)]
pub struct StaticSigningInfo {
    packages: HashMap<String, PrincipalFingerprints>,
}

impl StaticSigningInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a package's signing identities.
    pub fn insert(&mut self, package_name: impl Into<String>, fingerprints: PrincipalFingerprints) {
        self.packages.insert(package_name.into(), fingerprints);
    }

    /// Builder form of [`Self::insert`].
    pub fn with_package(
        mut self,
        package_name: impl Into<String>,
        fingerprints: PrincipalFingerprints,
    ) -> Self {
        self.insert(package_name, fingerprints);
        self
    }
}

impl SigningInfoProvider for StaticSigningInfo {
    fn fingerprints(&self, package_name: &str) -> Option<PrincipalFingerprints> {
        self.packages.get(package_name).cloned()
    }
}
