//! SHA-256 signing-certificate fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AssetLinksError, Result};
use crate::grammar::is_valid_fingerprint;

/// A SHA-256 certificate fingerprint.
///
/// Text form: 32 uppercase hex pairs joined by `:`, as published in
/// `sha256_cert_fingerprints`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fingerprint of a DER-encoded signing certificate.
    pub fn of_der_certificate(der: &[u8]) -> Self {
        Self(Sha256::digest(der).into())
    }

    /// Parse the colon-separated text form. Lowercase hex is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        if !is_valid_fingerprint(text) {
            return Err(AssetLinksError::InvalidInput(format!(
                "'{text}' is not a SHA-256 fingerprint (32 uppercase hex pairs separated by ':')"
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text.replace(':', ""), &mut bytes)
            .map_err(|e| AssetLinksError::InvalidInput(format!("bad fingerprint '{text}': {e}")))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = hex::encode_upper(self.0);
        for (i, pair) in encoded.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            // Hex output is ASCII.
            f.write_str(std::str::from_utf8(pair).map_err(|_| std::fmt::Error)?)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = AssetLinksError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = AssetLinksError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.to_string()
    }
}
