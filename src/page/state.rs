//! Search page state machine
//!
//! ```text
//!  Idle ──search──▶ Loading ──ok──▶ Loaded ──search──▶ Loading
//!                      │                                  ▲
//!                      └──err/timeout──▶ Error ──search───┘
//! ```
//!
//! Filter edits never start a query. While `Loading` every filter control is
//! disabled: edits and a second trigger are rejected with
//! [`PageError::ControlsDisabled`].

use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::error::AppError;
use crate::forum::{Question, Tag};
use crate::search::filter::{split_tag_list, TAG_PARAM};
use crate::search::{FilterState, ResolvedFilter};

use super::source::QuestionSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// No search has run yet
    Idle,
    Loading,
    /// Results populated, possibly empty
    Loaded,
    /// Last request failed; holds the user-facing message
    Error(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Filter controls are disabled while a search is in flight")]
    ControlsDisabled,
    #[error("Unknown tag: {0}")]
    UnknownTag(String),
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Enabled state of each filter control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub keyword_input: bool,
    pub tag_selector: bool,
    pub resolved_radios: bool,
    pub search_button: bool,
}

impl Controls {
    fn all(enabled: bool) -> Self {
        Self {
            keyword_input: enabled,
            tag_selector: enabled,
            resolved_radios: enabled,
            search_button: enabled,
        }
    }
}

/// A search handed out by [`SearchPage::begin_search`]
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub id: u64,
    pub filter: FilterState,
}

#[derive(Debug, Default)]
struct TagCatalog {
    tags: Vec<Tag>,
    names: HashSet<String>,
}

pub struct SearchPage {
    filter: FilterState,
    status: SearchStatus,
    questions: Vec<Question>,
    catalog: Option<TagCatalog>,
    initial_load: bool,
    next_request: u64,
}

impl Default for SearchPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPage {
    pub fn new() -> Self {
        Self {
            filter: FilterState::new(),
            status: SearchStatus::Idle,
            questions: Vec::new(),
            catalog: None,
            initial_load: false,
            next_request: 1,
        }
    }

    /// Page built from its URL query string.
    ///
    /// Only `tag` is read (single, repeated or comma-separated). When it is
    /// present the page owes an initial search, run by [`SearchPage::mount`].
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut page = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == TAG_PARAM {
                for name in split_tag_list(&value) {
                    page.filter.select_tag(name);
                }
            }
        }
        page.initial_load = !page.filter.selected_tags().is_empty();
        page
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Load the tag catalog, then run the URL-driven initial search if one is owed
    pub async fn mount<S: QuestionSource>(
        &mut self,
        source: &S,
        timeout: Duration,
    ) -> Result<(), PageError> {
        self.load_tags(source).await;
        if std::mem::take(&mut self.initial_load) {
            debug!(tags = ?self.filter.sorted_tags(), "Running initial search from URL");
            self.search(source, timeout).await?;
        }
        Ok(())
    }

    /// Fetch the tag catalog. On failure the selector keeps working without it.
    pub async fn load_tags<S: QuestionSource>(&mut self, source: &S) {
        match source.fetch_tags().await {
            Ok(tags) => self.set_tag_catalog(tags),
            Err(e) => warn!("Tag catalog unavailable: {}", e),
        }
    }

    pub fn set_tag_catalog(&mut self, tags: Vec<Tag>) {
        let names = tags.iter().map(|t| t.name.clone()).collect();
        self.catalog = Some(TagCatalog { tags, names });
    }

    /// Tags the selector offers, if a catalog is loaded
    pub fn tag_catalog(&self) -> Option<&[Tag]> {
        self.catalog.as_ref().map(|c| c.tags.as_slice())
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// Displayed results. Empty unless the page is `Loaded`.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn controls(&self) -> Controls {
        Controls::all(!self.is_loading())
    }

    pub fn search_button_label(&self) -> &'static str {
        if self.is_loading() {
            "Searching..."
        } else {
            "Search"
        }
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) -> Result<(), PageError> {
        self.ensure_editable()?;
        self.filter.set_keyword(keyword);
        Ok(())
    }

    /// Select a tag from the catalog. Tags cannot be created here.
    pub fn select_tag(&mut self, name: &str) -> Result<(), PageError> {
        self.ensure_editable()?;
        self.ensure_known(name)?;
        self.filter.select_tag(name);
        Ok(())
    }

    pub fn deselect_tag(&mut self, name: &str) -> Result<(), PageError> {
        self.ensure_editable()?;
        self.filter.deselect_tag(name);
        Ok(())
    }

    /// Returns whether the tag is selected afterwards
    pub fn toggle_tag(&mut self, name: &str) -> Result<bool, PageError> {
        self.ensure_editable()?;
        if self.filter.is_selected(name.trim()) {
            self.filter.deselect_tag(name);
            Ok(false)
        } else {
            self.ensure_known(name)?;
            Ok(self.filter.select_tag(name))
        }
    }

    pub fn set_resolved(&mut self, resolved: ResolvedFilter) -> Result<(), PageError> {
        self.ensure_editable()?;
        self.filter.set_resolved(resolved);
        Ok(())
    }

    /// Enter `Loading` and hand out a snapshot of the filter to query with
    pub fn begin_search(&mut self) -> Result<SearchRequest, PageError> {
        self.ensure_editable()?;
        self.initial_load = false;
        self.status = SearchStatus::Loading;

        let id = self.next_request;
        self.next_request += 1;
        debug!(request = id, "Search started");

        Ok(SearchRequest {
            id,
            filter: self.filter.clone(),
        })
    }

    /// Apply a finished request. The last completion applied wins.
    pub fn complete(&mut self, request: &SearchRequest, outcome: Result<Vec<Question>, AppError>) {
        match outcome {
            Ok(questions) => {
                debug!(request = request.id, count = questions.len(), "Search finished");
                self.questions = questions;
                self.status = SearchStatus::Loaded;
            }
            Err(e) => {
                warn!(request = request.id, "Search failed: {}", e);
                self.questions.clear();
                self.status = SearchStatus::Error(e.public_message());
            }
        }
    }

    /// Explicit search trigger: run one request against `source`, bounded by `timeout`
    pub async fn search<S: QuestionSource>(
        &mut self,
        source: &S,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let request = self.begin_search()?;
        let outcome = match tokio::time::timeout(timeout, source.fetch_questions(&request.filter)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "No response within {} seconds",
                timeout.as_secs_f32()
            ))),
        };
        self.complete(&request, outcome);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), PageError> {
        if self.is_loading() {
            return Err(PageError::ControlsDisabled);
        }
        Ok(())
    }

    fn ensure_known(&self, name: &str) -> Result<(), PageError> {
        match &self.catalog {
            Some(catalog) if !catalog.names.contains(name.trim()) => {
                Err(PageError::UnknownTag(name.trim().to_string()))
            }
            _ => Ok(()),
        }
    }
}
