//! Matcher + callback pairs registered with the parser.

use crate::error::{AssetLinksError, CallbackError, Result};
use crate::statement::RelationStatement;

use super::StatementMatcher;

/// Invoked once for every statement a matcher accepts.
pub type MatchCallback<'a> = Box<
    dyn FnMut(&StatementMatcher, &RelationStatement) -> std::result::Result<(), CallbackError>
        + 'a,
>;

/// A [`StatementMatcher`] bound to the callback that consumes its matches.
pub struct MatcherBinding<'a> {
    matcher: StatementMatcher,
    callback: MatchCallback<'a>,
}

impl<'a> MatcherBinding<'a> {
    /// Bind `callback` to `matcher`.
    pub fn new<F>(matcher: StatementMatcher, callback: F) -> Self
    where
        F: FnMut(&StatementMatcher, &RelationStatement) -> std::result::Result<(), CallbackError>
            + 'a,
    {
        Self {
            matcher,
            callback: Box::new(callback),
        }
    }

    /// The bound matcher.
    pub fn matcher(&self) -> &StatementMatcher {
        &self.matcher
    }

    /// Run the matcher against `statement`, invoking the callback on a match.
    ///
    /// Returns whether the statement matched. A callback failure is wrapped
    /// as [`AssetLinksError::MatcherCallback`].
    pub fn dispatch(&mut self, statement: &RelationStatement) -> Result<bool> {
        if !self.matcher.compare(statement) {
            return Ok(false);
        }
        (self.callback)(&self.matcher, statement).map_err(AssetLinksError::MatcherCallback)?;
        Ok(true)
    }
}

impl std::fmt::Debug for MatcherBinding<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherBinding")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
