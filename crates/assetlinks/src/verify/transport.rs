//! Document transport: the seam between the verifier and the network.

use std::io::Read;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::error::{AssetLinksError, Result};

use super::cancel::{CancellableReader, CancellationToken};

/// Timeouts for [`HttpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl TransportConfig {
    /// Tighter timeouts used when verifying app packages.
    pub fn app_verification() -> Self {
        Self {
            connect_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_millis(500),
        }
    }

    /// Use the same timeout for connecting and reading.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: timeout,
            read_timeout: timeout,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::with_timeout(Duration::from_millis(1000))
    }
}

/// A fetched response, body not yet read.
pub struct FetchedDocument {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body, consumed by the verifier under its size cap.
    pub body: Box<dyn Read + Send>,
}

impl FetchedDocument {
    /// A `200 application/json` response with an in-memory body.
    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: Some(crate::grammar::CONTENT_TYPE_JSON.to_string()),
            body: Box::new(std::io::Cursor::new(body.into())),
        }
    }

    /// A body-less response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Box::new(std::io::empty()),
        }
    }
}

impl std::fmt::Debug for FetchedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedDocument")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Fetches statement-list documents.
///
/// Implementations must not follow redirects. Non-200 responses are
/// returned as documents, not errors; the verifier decides what a status
/// means. The token should be observed while the body is streamed, and a
/// request that fails after the token fired should report
/// [`AssetLinksError::Cancelled`].
pub trait DocumentTransport {
    fn fetch(&self, uri: &Url, cancel: &CancellationToken) -> Result<FetchedDocument>;
}

impl<T: DocumentTransport + ?Sized> DocumentTransport for &T {
    fn fetch(&self, uri: &Url, cancel: &CancellationToken) -> Result<FetchedDocument> {
        (**self).fetch(uri, cancel)
    }
}

/// Blocking HTTP(S) transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .redirects(0)
            .build();
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl DocumentTransport for HttpTransport {
    fn fetch(&self, uri: &Url, cancel: &CancellationToken) -> Result<FetchedDocument> {
        debug!("GET {uri}");
        let response = match self.agent.get(uri.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            // ureq cannot abort a call in flight; the timeout ends it.
            Err(ureq::Error::Transport(_)) if cancel.is_cancelled() => {
                return Err(AssetLinksError::Cancelled)
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(AssetLinksError::Transport {
                    uri: uri.to_string(),
                    reason: err.to_string(),
                })
            }
        };

        let status = response.status();
        let content_type = response.header("content-type").map(str::to_owned);
        let body = CancellableReader::new(response.into_reader(), cancel.clone());
        Ok(FetchedDocument {
            status,
            content_type,
            body: Box::new(body),
        })
    }
}
