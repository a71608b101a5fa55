//! Cooperative cancellation shared between a verification and `cancel()`.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AssetLinksError, Result};

/// A cloneable cancellation flag.
///
/// Every clone observes the same flag. Cancellation is advisory: it is
/// noticed at the next checkpoint, not instantaneously.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Fail with [`AssetLinksError::Cancelled`] if cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AssetLinksError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A reader that fails every read once its token is cancelled.
///
/// Transports wrap response bodies in this so a cancellation from another
/// thread stops an in-flight download at the next chunk.
pub struct CancellableReader<R> {
    inner: R,
    token: CancellationToken,
}

impl<R> CancellableReader<R> {
    pub fn new(inner: R, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

impl<R: Read> Read for CancellableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.token.is_cancelled() {
            // Not `Interrupted`: std readers retry those.
            return Err(io::Error::new(io::ErrorKind::Other, "download cancelled"));
        }
        self.inner.read(buf)
    }
}
