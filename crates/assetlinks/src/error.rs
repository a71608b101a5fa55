//! Error types for assetlinks.
//!
//! All errors are strongly typed and propagated without panicking.
//! Callers distinguish three outcomes: the request itself was malformed
//! ([`AssetLinksError::is_input_error`]), verification could not be
//! completed ([`AssetLinksError::is_could_not_verify`]), or the API was
//! misused (concurrent verification, parser driven out of order).

/// Boxed error returned by statement match callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Asset Links error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetLinksError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed loading Asset Links document {uri}: {reason}")]
    Transport { uri: String, reason: String },

    #[error("Asset Links document fetch failed for {uri}: status {status}, expected 200")]
    UnexpectedStatus { uri: String, status: u16 },

    #[error("Asset Links document {uri} too long: exceeds {max} characters")]
    DocumentTooLarge { uri: String, max: usize },

    #[error("Ill-formed statement list: {0}")]
    IllFormedStatement(String),

    #[error("Too many includes: statement tree exceeds {max} documents")]
    TooManyIncludes { max: usize },

    #[error("Statement matcher input is not well-formed: {0}")]
    MatcherInput(String),

    #[error("Matcher callback failed, terminating statement processing: {0}")]
    MatcherCallback(#[source] CallbackError),

    #[error("Asset Links verification cancelled")]
    Cancelled,

    #[error("Verification already in progress")]
    VerificationInProgress,

    #[error("Parser state error: {0}")]
    ParserState(String),

    #[error("Unknown principal: {0}")]
    UnknownPrincipal(String),
}

impl AssetLinksError {
    /// The request was rejected before any I/O took place.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Verification was attempted but could not reach a conclusion.
    ///
    /// A relationship was not established; it was not disproven either.
    pub fn is_could_not_verify(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::UnexpectedStatus { .. }
                | Self::DocumentTooLarge { .. }
                | Self::IllFormedStatement(_)
                | Self::TooManyIncludes { .. }
                | Self::MatcherInput(_)
                | Self::MatcherCallback(_)
                | Self::Cancelled
                | Self::UnknownPrincipal(_)
        )
    }

    /// Transport-level failure: fetch error, bad status, or oversized body.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::UnexpectedStatus { .. } | Self::DocumentTooLarge { .. }
        )
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, AssetLinksError>;
