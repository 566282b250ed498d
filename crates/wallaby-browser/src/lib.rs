//! Headless browser session for Wallaby.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch and parse HTML from a URL, file, or
//!   in-memory string
//! - **Navigation History** - a back/forward stack of loaded pages
//! - **Element Queries** - whole-document and scoped CSS-subset queries,
//!   plus attribute-bag lookup
//! - **Interaction Simulation** - clicks (links, checkboxes, radios,
//!   options, buttons) and form value extraction
//!
//! There is no rendering engine and no script execution: the session is
//! pure state-threading over the parsed tree.

/// Element classification and click simulation.
pub mod element;
/// Form value extraction.
pub mod forms;
/// Attribute-bag element lookup.
pub mod lookup;

pub use element::{ClickOutcome, ElementKind, classify, click, enclosing_form};
pub use forms::values_to_submit;
pub use lookup::ElementLookup;

pub use wallaby_dom as dom;
pub use wallaby_html as html;
pub use wallaby_query as query;

use std::fs;

use thiserror::Error;
use wallaby_common::net::{FetchError, fetch_text};
use wallaby_common::url::resolve_url;
use wallaby_common::warning::clear_warnings;
use wallaby_dom::{Document, NodeId};
use wallaby_html::{ParseOptions, parse_document};
use wallaby_query::QueryError;

/// Error type for browser session operations.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// A local file could not be read.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),

    /// An HTTP fetch failed.
    #[error("network error: {0}")]
    Network(#[from] FetchError),

    /// The query string did not parse.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The session has no loaded document yet.
    #[error("no document loaded")]
    NoDocument,

    /// A clicked element cannot trigger navigation.
    #[error("element is not a followable link")]
    NotALink,
}

/// One loaded page: its source, URL, and parsed tree.
pub struct Page {
    /// The URL the page was loaded from, when it came over the network.
    pub url: Option<String>,
    /// The original HTML source.
    pub source: String,
    /// The parsed document tree.
    pub document: Document,
}

/// A headless browser session.
///
/// Holds the navigation history and the current document; parsing and
/// querying both happen against the page at the history cursor. A new
/// navigation replaces the current tree wholesale - the previous tree is
/// orphaned in its history entry, never mutated in place.
pub struct Browser {
    options: ParseOptions,
    history: Vec<Page>,
    cursor: usize,
}

impl Browser {
    /// Create a session with the given parse options.
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self {
            options,
            history: Vec::new(),
            cursor: 0,
        }
    }

    /// Fetch a URL (or read a local path) and make it the current page.
    ///
    /// # Errors
    ///
    /// Returns a [`BrowseError`] if the fetch or file read fails. Parsing
    /// never fails: malformed HTML degrades to a best-effort tree, and a
    /// source that produces no usable root is replaced by the minimal
    /// empty document so the session always holds a valid tree.
    pub fn navigate(&mut self, target: &str) -> Result<(), BrowseError> {
        let source = if target.starts_with("http://") || target.starts_with("https://") {
            fetch_text(target)?
        } else {
            fs::read_to_string(target)?
        };
        self.push_page(&source, Some(target));
        Ok(())
    }

    /// Parse an in-memory HTML string and make it the current page.
    pub fn load_html(&mut self, html: &str, url: Option<&str>) {
        self.push_page(html, url);
    }

    fn push_page(&mut self, source: &str, url: Option<&str>) {
        clear_warnings();
        let mut document = parse_document(source, &self.options);
        // A browser session always has some valid current document; fall
        // back to the minimal one rather than keep an unusable tree.
        if document.document_element().is_none() {
            document = parse_document("<html><body></body></html>", &self.options);
        }
        // A new navigation truncates any forward entries.
        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(Page {
            url: url.map(ToString::to_string),
            source: source.to_string(),
            document,
        });
        self.cursor = self.history.len() - 1;
    }

    /// The current page, if any.
    #[must_use]
    pub fn page(&self) -> Option<&Page> {
        self.history.get(self.cursor)
    }

    /// The current document tree, if any.
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.page().map(|p| &p.document)
    }

    /// Mutable access to the current document tree, for attribute edits
    /// (`value`, `checked`, `selected`) between queries.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.history.get_mut(self.cursor).map(|p| &mut p.document)
    }

    /// Step back in history. Returns false when already at the oldest page.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 || self.history.is_empty() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward in history. Returns false when already at the newest
    /// page.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Run a selector query against the whole current document.
    ///
    /// # Errors
    ///
    /// [`BrowseError::NoDocument`] before the first load, or a
    /// [`BrowseError::Query`] for a query that does not parse.
    pub fn find(&self, query: &str) -> Result<Vec<NodeId>, BrowseError> {
        let document = self.document().ok_or(BrowseError::NoDocument)?;
        Ok(wallaby_query::execute(query, document)?)
    }

    /// Run a selector query scoped to the subtree under `scope`.
    ///
    /// The starting set is the scope element's descendants, so matching
    /// can never escape the subtree.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Browser::find`].
    pub fn find_within(&self, scope: NodeId, query: &str) -> Result<Vec<NodeId>, BrowseError> {
        let document = self.document().ok_or(BrowseError::NoDocument)?;
        let start: Vec<NodeId> = document
            .descendants(scope)
            .filter(|&id| document.as_element(id).is_some())
            .collect();
        Ok(wallaby_query::execute_within(query, document, &start)?)
    }

    /// Find elements by explicit attribute-bag criteria.
    ///
    /// # Errors
    ///
    /// [`BrowseError::NoDocument`] before the first load.
    pub fn find_by(&self, lookup: &ElementLookup) -> Result<Vec<NodeId>, BrowseError> {
        let document = self.document().ok_or(BrowseError::NoDocument)?;
        Ok(lookup.find(document))
    }

    /// Simulate a click on an element of the current document.
    ///
    /// # Errors
    ///
    /// [`BrowseError::NoDocument`] before the first load.
    pub fn click(&mut self, id: NodeId) -> Result<ClickOutcome, BrowseError> {
        let document = self.document_mut().ok_or(BrowseError::NoDocument)?;
        Ok(click(document, id))
    }

    /// Click a link and navigate to its (resolved) target.
    ///
    /// # Errors
    ///
    /// [`BrowseError::NotALink`] when the click does not produce a
    /// navigation, plus the failure modes of [`Browser::navigate`].
    pub fn follow(&mut self, id: NodeId) -> Result<(), BrowseError> {
        let outcome = self.click(id)?;
        let ClickOutcome::Navigate(href) = outcome else {
            return Err(BrowseError::NotALink);
        };
        let base = self.page().and_then(|p| p.url.clone());
        let target = resolve_url(&href, base.as_deref());
        self.navigate(&target)
    }

    /// Collect the `(name, value)` pairs the given form would submit.
    ///
    /// # Errors
    ///
    /// [`BrowseError::NoDocument`] before the first load.
    pub fn form_values(&self, form: NodeId) -> Result<Vec<(String, String)>, BrowseError> {
        let document = self.document().ok_or(BrowseError::NoDocument)?;
        Ok(values_to_submit(document, form))
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}
