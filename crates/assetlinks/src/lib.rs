//! assetlinks: Digital Asset Links verification.
//!
//! Verifies relationships published by web origins in their well-known
//! statement lists (`/.well-known/assetlinks.json`), following include
//! directives across a bounded tree of documents. Supports checking that
//! an origin vouches for an Android app package by its signing
//! certificate fingerprints, and listing or checking individual
//! statements.

pub mod error;
pub mod grammar;
pub mod identity;
pub mod matcher;
pub mod parser;
pub mod query;
pub mod statement;
pub mod verify;

// Re-export primary types
pub use error::{AssetLinksError, Result};
pub use grammar::{well_known_uri, MAX_ASSET_LINKS_URIS};
pub use matcher::{android_app_matcher, web_site_matcher, FieldCondition, MatcherBinding, StatementMatcher};
pub use parser::{ParserState, StatementListParser};
pub use statement::{RelationStatement, StatementListEntry, Target};

// Re-export verification types
pub use verify::{
    CancellationToken, DocumentTransport, FetchedDocument, HttpTransport, SourceVerification,
    SourceVerifier, TransportConfig, VerifierConfig,
};

// Re-export identity types
pub use identity::{
    AppPackageVerifier, Fingerprint, PrincipalFingerprints, SigningInfoProvider, StaticSigningInfo,
};

// Re-export query types
pub use query::{check_statement, list_statements, Asset, Statement, StatementListing};
