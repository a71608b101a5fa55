//! In-memory web content for driving verifiers without a network.
//!
//! Pages are keyed by canonical URI; anything not hosted answers 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use assetlinks::grammar::canonicalize;
use assetlinks::verify::CancellableReader;
use assetlinks::{CancellationToken, DocumentTransport, FetchedDocument, Result};
use url::Url;

/// One hosted resource.
#[derive(Debug, Clone)]
pub struct Content {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
    /// Per-byte delay while streaming the body.
    pub byte_delay: Option<Duration>,
}

impl Content {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".into()),
            body: body.into(),
            byte_delay: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn slow(mut self, byte_delay: Duration) -> Self {
        self.byte_delay = Some(byte_delay);
        self
    }
}

#[derive(Debug, Default)]
pub struct MockWeb {
    pages: HashMap<Url, Content>,
    fetches: AtomicUsize,
    fetched: Mutex<Vec<Url>>,
}

impl MockWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(self, uri: &str, body: &str) -> Self {
        self.page(uri, Content::json(body))
    }

    pub fn page(mut self, uri: &str, content: Content) -> Self {
        let uri = Url::parse(uri).expect("test URI must be absolute");
        self.pages.insert(canonicalize(&uri), content);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// URIs requested so far, in order.
    pub fn fetched(&self) -> Vec<Url> {
        self.fetched.lock().unwrap().clone()
    }
}

impl DocumentTransport for MockWeb {
    fn fetch(&self, uri: &Url, cancel: &CancellationToken) -> Result<FetchedDocument> {
        self.fetched.lock().unwrap().push(uri.clone());
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let Some(content) = self.pages.get(&canonicalize(uri)) else {
            return Ok(FetchedDocument::status(404));
        };
        let bytes = content.body.clone().into_bytes();
        let body: Box<dyn Read + Send> = match content.byte_delay {
            Some(delay) => Box::new(SlowBody {
                data: bytes,
                pos: 0,
                delay,
            }),
            None => Box::new(Cursor::new(bytes)),
        };
        Ok(FetchedDocument {
            status: content.status,
            content_type: content.content_type.clone(),
            body: Box::new(CancellableReader::new(body, cancel.clone())),
        })
    }
}

/// Yields one byte per `delay`.
struct SlowBody {
    data: Vec<u8>,
    pos: usize,
    delay: Duration,
}

impl Read for SlowBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        std::thread::sleep(self.delay);
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

// ── Statement fixtures ────────────────────────────────────────────────────────

pub const HANDLE_ALL_URLS: &str = "delegate_permission/common.handle_all_urls";
pub const GET_LOGIN_CREDS: &str = "delegate_permission/common.get_login_creds";

/// SHA-256 of the one-byte certificate `[0x01]`.
pub const CERT_1_FP: &str = "4B:F5:12:2F:34:45:54:C5:3B:DE:2E:BB:8C:D2:B7:E3:D1:60:0A:D6:31:C3:85:A5:D7:CC:E2:3C:77:85:45:9A";
/// SHA-256 of the one-byte certificate `[0x02]`.
pub const CERT_2_FP: &str = "DB:C1:B4:C9:00:FF:E4:8D:57:5B:5D:A5:C6:38:04:01:25:F6:5D:B0:FE:3E:24:49:4B:76:EA:98:64:57:D9:86";
/// SHA-256 of the one-byte certificate `[0x03]`.
pub const CERT_3_FP: &str = "08:4F:ED:08:B9:78:AF:4D:7D:19:6A:74:46:A8:6B:58:00:9E:63:6B:61:1D:B1:62:11:B6:5A:9A:AD:FF:29:C5";

pub fn web_statement(relation: &str, site: &str) -> String {
    format!(
        r#"{{"relation": ["{relation}"], "target": {{"namespace": "web", "site": "{site}"}}}}"#
    )
}

pub fn app_statement(relation: &str, package: &str, fingerprints: &[&str]) -> String {
    let fps: Vec<String> = fingerprints.iter().map(|fp| format!("\"{fp}\"")).collect();
    format!(
        r#"{{"relation": ["{relation}"], "target": {{"namespace": "android_app", "package_name": "{package}", "sha256_cert_fingerprints": [{}]}}}}"#,
        fps.join(", ")
    )
}

pub fn include(uri: &str) -> String {
    format!(r#"{{"include": "{uri}"}}"#)
}

pub fn statement_list(entries: &[String]) -> String {
    format!("[{}]", entries.join(", "))
}
