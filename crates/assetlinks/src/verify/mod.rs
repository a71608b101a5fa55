//! Source verification: fetch and walk an origin's statement tree.
//!
//! [`SourceVerifier`] derives the well-known statement-list URI for an
//! origin, drives a [`StatementListParser`] through the include tree by
//! fetching each requested document with its [`DocumentTransport`], and
//! reports which documents were visited and whether any non-fatal warning
//! occurred. It does not by itself establish any relationship; callers do
//! that through the matchers they register.
//!
//! # Modules
//!
//! - [`cancel`]: cancellation token and cancellable body reader.
//! - [`transport`]: the transport trait and the `ureq` implementation.

pub mod cancel;
pub mod transport;

pub use cancel::{CancellableReader, CancellationToken};
pub use transport::{DocumentTransport, FetchedDocument, HttpTransport, TransportConfig};

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use url::Url;

use crate::error::{AssetLinksError, Result};
use crate::grammar::{self, parse_source_origin, well_known_uri};
use crate::matcher::MatcherBinding;
use crate::parser::StatementListParser;

/// Tunables for [`SourceVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Upper bound on decoded characters per document.
    pub max_document_chars: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 50 * 1024,
        }
    }
}

/// Outcome of a completed walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceVerification {
    /// Every document in the statement tree, source first.
    pub document_uris: Vec<Url>,
    /// Whether any non-fatal warning occurred. Informational only.
    pub had_warnings: bool,
    /// When the walk completed.
    pub verified_at: DateTime<Utc>,
}

/// Walks statement trees; at most one walk in progress per instance.
pub struct SourceVerifier<T = HttpTransport> {
    transport: T,
    config: VerifierConfig,
    in_progress: AtomicBool,
    active: Mutex<Option<CancellationToken>>,
}

impl SourceVerifier<HttpTransport> {
    /// A verifier fetching over HTTP(S) with the given timeouts.
    pub fn with_http(config: TransportConfig) -> Self {
        Self::new(HttpTransport::new(config), VerifierConfig::default())
    }
}

impl Default for SourceVerifier<HttpTransport> {
    fn default() -> Self {
        Self::with_http(TransportConfig::default())
    }
}

impl<T: DocumentTransport> SourceVerifier<T> {
    pub fn new(transport: T, config: VerifierConfig) -> Self {
        Self {
            transport,
            config,
            in_progress: AtomicBool::new(false),
            active: Mutex::new(None),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Is a walk currently running on this instance?
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Walk the statement tree rooted at `source`'s well-known document,
    /// dispatching every statement to the given matcher bindings.
    ///
    /// `source` must be an absolute, hierarchical http or https URI;
    /// anything else fails with [`AssetLinksError::InvalidInput`] before
    /// any I/O. A concurrent call on the same instance fails immediately
    /// with [`AssetLinksError::VerificationInProgress`].
    ///
    /// Blocks on network I/O.
    pub fn verify(
        &self,
        source: &str,
        bindings: Vec<MatcherBinding<'_>>,
    ) -> Result<SourceVerification> {
        let origin = parse_source_origin(source)?;
        self.verify_origin(&origin, bindings)
    }

    /// Same as [`Self::verify`] for an already-parsed origin.
    pub fn verify_origin(
        &self,
        origin: &Url,
        bindings: Vec<MatcherBinding<'_>>,
    ) -> Result<SourceVerification> {
        let root = well_known_uri(origin)?;
        let session = Session::begin(self)?;

        let mut parser = StatementListParser::new();
        for binding in bindings {
            parser.add_matcher(binding)?;
        }

        let mut next = Some(parser.start(root)?);
        while let Some(uri) = next {
            session.token.check()?;
            let document = self.load_document(&uri, &session.token)?;
            session.token.check()?;
            next = parser.on_document_loaded(&uri, &document)?;
        }

        info!(
            "verified statement tree for {origin}: {} document(s), warnings={}",
            parser.uris().len(),
            parser.has_warnings()
        );
        Ok(SourceVerification {
            document_uris: parser.uris().to_vec(),
            had_warnings: parser.has_warnings(),
            verified_at: Utc::now(),
        })
    }

    /// Ask the running walk, if any, to stop.
    ///
    /// Returns immediately. The walk fails with
    /// [`AssetLinksError::Cancelled`] at its next checkpoint, an in-flight
    /// body download stops at its next chunk, and a request still waiting
    /// on the network reports `Cancelled` once the transport gives up. No
    /// effect when nothing is running.
    pub fn cancel(&self) {
        if let Some(token) = lock(&self.active).as_ref() {
            debug!("cancelling in-progress verification");
            token.cancel();
        }
    }

    fn load_document(&self, uri: &Url, token: &CancellationToken) -> Result<String> {
        debug!("loading statement list {uri}");
        let fetched = match self.transport.fetch(uri, token) {
            Ok(fetched) => fetched,
            Err(_) if token.is_cancelled() => return Err(AssetLinksError::Cancelled),
            Err(e) => return Err(e),
        };
        token.check()?;
        if fetched.status != 200 {
            return Err(AssetLinksError::UnexpectedStatus {
                uri: uri.to_string(),
                status: fetched.status,
            });
        }

        let media_type = fetched
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim());
        match media_type {
            Some(mt) if mt.eq_ignore_ascii_case(grammar::CONTENT_TYPE_JSON) => {}
            other => warn!(
                "statement list {uri} has content type {}, expected {}",
                other.unwrap_or("<none>"),
                grammar::CONTENT_TYPE_JSON
            ),
        }

        read_bounded(uri, fetched.body, self.config.max_document_chars, token)
    }
}

/// Read a UTF-8 body, failing once it exceeds `max_chars` decoded chars.
fn read_bounded(
    uri: &Url,
    mut body: Box<dyn Read + Send>,
    max_chars: usize,
    token: &CancellationToken,
) -> Result<String> {
    let too_large = || AssetLinksError::DocumentTooLarge {
        uri: uri.to_string(),
        max: max_chars,
    };

    let mut bytes = Vec::new();
    let mut chars = 0usize;
    let mut buf = [0u8; 2048];
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) if token.is_cancelled() => return Err(AssetLinksError::Cancelled),
            Err(e) => {
                return Err(AssetLinksError::Transport {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        // Count chars as UTF-8 lead bytes; continuation bytes are 0b10xxxxxx.
        chars += buf[..n].iter().filter(|b| (**b & 0xC0) != 0x80).count();
        bytes.extend_from_slice(&buf[..n]);
        if chars > max_chars || bytes.len() > max_chars.saturating_mul(4) {
            return Err(too_large());
        }
    }

    String::from_utf8(bytes).map_err(|e| AssetLinksError::Transport {
        uri: uri.to_string(),
        reason: format!("document is not valid UTF-8: {e}"),
    })
}

fn lock(active: &Mutex<Option<CancellationToken>>) -> MutexGuard<'_, Option<CancellationToken>> {
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The single in-progress walk of a verifier. Released on drop, whatever
/// the outcome.
struct Session<'v> {
    in_progress: &'v AtomicBool,
    active: &'v Mutex<Option<CancellationToken>>,
    token: CancellationToken,
}

impl<'v> Session<'v> {
    // The token is installed under the `active` lock before the flag flips,
    // so a `cancel()` seen after `is_in_progress()` always reaches it.
    fn begin<T>(verifier: &'v SourceVerifier<T>) -> Result<Self> {
        let mut active = lock(&verifier.active);
        verifier
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AssetLinksError::VerificationInProgress)?;
        let token = CancellationToken::new();
        *active = Some(token.clone());
        drop(active);
        Ok(Self {
            in_progress: &verifier.in_progress,
            active: &verifier.active,
            token,
        })
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        *lock(self.active) = None;
        self.in_progress.store(false, Ordering::Release);
    }
}
