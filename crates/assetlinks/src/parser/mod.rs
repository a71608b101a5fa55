//! Include-tree parser: a resumable walker fed one document at a time.
//!
//! The parser never performs I/O. It hands out the URI of the next document
//! it needs; the caller fetches it and feeds it back through
//! [`StatementListParser::on_document_loaded`]. The tree of documents is
//! an append-only list starting at the source URI, capped at
//! [`MAX_ASSET_LINKS_URIS`] entries.
//!
//! Error policy:
//! - An ill-formed source document (index 0) is fatal.
//! - An ill-formed included document is discarded with a warning and the
//!   walk continues.
//! - An http include anywhere in a tree rooted at an https source is
//!   always fatal.
//! - Exceeding the tree size is always fatal.
//! - A failing match callback is always fatal.

use log::{debug, warn};
use url::Url;

use crate::error::{AssetLinksError, Result};
use crate::grammar::MAX_ASSET_LINKS_URIS;
use crate::matcher::MatcherBinding;
use crate::statement::{parse_statement_list, RelationStatement, StatementListEntry};

/// Parser lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// [`StatementListParser::start`] has not been called.
    NotStarted,
    /// Waiting for the document at this index of the tree.
    AwaitingDocument(usize),
    /// Every document in the tree has been processed.
    Complete,
    /// A fatal error occurred; no further documents are accepted.
    Error,
}

/// Walks a statement-list include tree and dispatches matched statements.
pub struct StatementListParser<'a> {
    uris: Vec<Url>,
    state: ParserState,
    bindings: Vec<MatcherBinding<'a>>,
    source_secure: bool,
    warning: bool,
}

/// The statements and includes accepted from one document.
#[derive(Default)]
struct LoadedDocument {
    includes: Vec<Url>,
    statements: Vec<RelationStatement>,
}

impl<'a> StatementListParser<'a> {
    /// Create a parser with no matchers.
    pub fn new() -> Self {
        Self {
            uris: Vec::with_capacity(1),
            state: ParserState::NotStarted,
            bindings: Vec::new(),
            source_secure: false,
            warning: false,
        }
    }

    /// Register a matcher. All matchers must be added before [`Self::start`].
    pub fn add_matcher(&mut self, binding: MatcherBinding<'a>) -> Result<()> {
        if self.state != ParserState::NotStarted {
            return Err(AssetLinksError::ParserState(
                "matchers must be added before the parser is started".into(),
            ));
        }
        self.bindings.push(binding);
        Ok(())
    }

    /// Start walking from `source`; returns the first URI to fetch.
    ///
    /// An https source requires every include anywhere in the tree to be
    /// https as well.
    pub fn start(&mut self, source: Url) -> Result<Url> {
        if self.state != ParserState::NotStarted {
            return Err(AssetLinksError::ParserState("already started".into()));
        }
        self.source_secure = source.scheme() == "https";
        self.uris.push(source.clone());
        self.state = ParserState::AwaitingDocument(0);
        Ok(source)
    }

    /// Feed the contents of the document most recently requested.
    ///
    /// Returns the next URI to fetch, or `None` when the tree is complete.
    /// Any error moves the parser to [`ParserState::Error`], after which
    /// every call fails immediately.
    pub fn on_document_loaded(&mut self, uri: &Url, document: &str) -> Result<Option<Url>> {
        let index = match self.state {
            ParserState::AwaitingDocument(index) => index,
            ParserState::Error => {
                return Err(AssetLinksError::ParserState(
                    "parser already in the error state".into(),
                ))
            }
            ParserState::NotStarted => {
                return Err(AssetLinksError::ParserState("parser not started".into()))
            }
            ParserState::Complete => {
                return Err(AssetLinksError::ParserState("parser already complete".into()))
            }
        };

        match self.process(index, uri, document) {
            Ok(next) => Ok(next),
            Err(e) => {
                self.state = ParserState::Error;
                Err(e)
            }
        }
    }

    fn process(&mut self, index: usize, uri: &Url, document: &str) -> Result<Option<Url>> {
        let expected = &self.uris[index];
        if uri != expected {
            return Err(AssetLinksError::ParserState(format!(
                "document URI does not match expected value: expected={expected}, actual={uri}"
            )));
        }

        let loaded = match self.load(uri, document) {
            Ok(loaded) => loaded,
            Err(AssetLinksError::IllFormedStatement(reason)) if index > 0 => {
                warn!("discarding ill-formed included document {uri}: {reason}");
                self.warning = true;
                LoadedDocument::default()
            }
            Err(e) => return Err(e),
        };

        if self.source_secure {
            if let Some(insecure) = loaded.includes.iter().find(|u| u.scheme() != "https") {
                return Err(AssetLinksError::IllFormedStatement(format!(
                    "include must reference a secure location when the source is secure; uri={insecure}"
                )));
            }
        }

        self.append_includes(uri, loaded.includes)?;

        for statement in &loaded.statements {
            for binding in &mut self.bindings {
                binding.dispatch(statement)?;
            }
        }

        let next = index + 1;
        if next == self.uris.len() {
            debug!("statement tree complete after {next} document(s)");
            self.state = ParserState::Complete;
            Ok(None)
        } else {
            self.state = ParserState::AwaitingDocument(next);
            Ok(Some(self.uris[next].clone()))
        }
    }

    fn load(&mut self, uri: &Url, document: &str) -> Result<LoadedDocument> {
        let mut loaded = LoadedDocument::default();
        let mut skipped = 0usize;

        for entry in parse_statement_list(uri, document)? {
            match entry {
                StatementListEntry::Include(include) => loaded.includes.push(include),
                StatementListEntry::Relation(statement) => loaded.statements.push(statement),
                StatementListEntry::Unrecognized => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!("skipped {skipped} unrecognized statement(s) in {uri}");
            self.warning = true;
        }
        Ok(loaded)
    }

    fn append_includes(&mut self, uri: &Url, includes: Vec<Url>) -> Result<()> {
        let mut elided = 0usize;
        for include in includes {
            if self.uris.contains(&include) {
                elided += 1;
                continue;
            }
            debug!("{uri} includes {include}");
            self.uris.push(include);
            if self.uris.len() > MAX_ASSET_LINKS_URIS {
                return Err(AssetLinksError::TooManyIncludes {
                    max: MAX_ASSET_LINKS_URIS,
                });
            }
        }
        if elided > 0 {
            warn!("elided {elided} duplicate include(s) in {uri}");
            self.warning = true;
        }
        Ok(())
    }

    /// Every URI in the tree, in discovery order; the first is the source.
    pub fn uris(&self) -> &[Url] {
        &self.uris
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Has the whole tree been processed without a fatal error?
    pub fn is_complete(&self) -> bool {
        self.state == ParserState::Complete
    }

    /// Has a fatal error occurred? Callback results should then be ignored.
    pub fn is_error(&self) -> bool {
        self.state == ParserState::Error
    }

    /// Did any non-fatal warning occur?
    pub fn has_warnings(&self) -> bool {
        self.warning
    }
}

impl Default for StatementListParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}
