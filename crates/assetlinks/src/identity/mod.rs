//! App identity verification: is an app package vouched for by an origin?
//!
//! An app package is identified by its name and the SHA-256 fingerprints
//! of its signing certificates. An origin vouches for it by publishing a
//! `delegate_permission/common.handle_all_urls` statement targeting the
//! package with matching fingerprints.

pub mod fingerprint;
pub mod signing;
pub mod verifier;

pub use fingerprint::Fingerprint;
pub use signing::{PrincipalFingerprints, SigningInfoProvider, StaticSigningInfo};
pub use verifier::AppPackageVerifier;
