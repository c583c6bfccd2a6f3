//! Filter state shared by the query endpoint and the search page
//!
//! The same three query parameters travel in both directions: the page
//! serializes its state with [`FilterState::to_query_pairs`] and the endpoint
//! reads them back with [`FilterState::from_query_str`].

use std::collections::HashSet;

pub const TAG_PARAM: &str = "tag";
pub const RESOLVED_PARAM: &str = "isResolved";
pub const KEYWORD_PARAM: &str = "keyword";

/// Tri-state resolved filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedFilter {
    /// No restriction on this dimension
    #[default]
    Any,
    Resolved,
    Unresolved,
}

impl ResolvedFilter {
    /// Read the `isResolved` parameter. Anything but `true`/`false` is unset.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("true") => ResolvedFilter::Resolved,
            Some("false") => ResolvedFilter::Unresolved,
            _ => ResolvedFilter::Any,
        }
    }

    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            ResolvedFilter::Any => None,
            ResolvedFilter::Resolved => Some("true"),
            ResolvedFilter::Unresolved => Some("false"),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResolvedFilter::Any => None,
            ResolvedFilter::Resolved => Some(true),
            ResolvedFilter::Unresolved => Some(false),
        }
    }
}

impl From<Option<bool>> for ResolvedFilter {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ResolvedFilter::Any,
            Some(true) => ResolvedFilter::Resolved,
            Some(false) => ResolvedFilter::Unresolved,
        }
    }
}

/// Keyword, tag selection and resolved choice driving one search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    keyword: String,
    selected_tags: HashSet<String>,
    resolved: ResolvedFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.select_tag(name);
        self
    }

    pub fn with_resolved(mut self, resolved: ResolvedFilter) -> Self {
        self.resolved = resolved;
        self
    }

    /// Parse an URL query string (`tag=a,b&isResolved=true&keyword=x`).
    ///
    /// `tag` may repeat and each value may hold a comma-separated list.
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = FilterState::new();
        for (key, value) in pairs {
            match key.as_ref() {
                TAG_PARAM => {
                    for name in split_tag_list(value.as_ref()) {
                        filter.selected_tags.insert(name.to_string());
                    }
                }
                RESOLVED_PARAM => filter.resolved = ResolvedFilter::from_param(Some(value.as_ref())),
                KEYWORD_PARAM => filter.keyword = value.as_ref().to_string(),
                _ => {}
            }
        }
        filter
    }

    /// Query parameters for the active predicates only
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.selected_tags.is_empty() {
            pairs.push((TAG_PARAM, self.sorted_tags().join(",")));
        }
        if let Some(keyword) = self.active_keyword() {
            pairs.push((KEYWORD_PARAM, keyword.to_string()));
        }
        if let Some(resolved) = self.resolved.as_param() {
            pairs.push((RESOLVED_PARAM, resolved.to_string()));
        }
        pairs
    }

    /// Raw keyword as typed
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// Trimmed keyword, `None` when blank
    pub fn active_keyword(&self) -> Option<&str> {
        let trimmed = self.keyword.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn selected_tags(&self) -> &HashSet<String> {
        &self.selected_tags
    }

    /// Selected tag names in a stable order
    pub fn sorted_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.selected_tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_tags.contains(name)
    }

    /// Returns true when the tag was not selected before
    pub fn select_tag(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.selected_tags.insert(name.to_string())
    }

    pub fn deselect_tag(&mut self, name: &str) -> bool {
        self.selected_tags.remove(name.trim())
    }

    /// Flip a tag and return whether it is now selected
    pub fn toggle_tag(&mut self, name: &str) -> bool {
        if self.deselect_tag(name) {
            false
        } else {
            self.select_tag(name)
        }
    }

    pub fn resolved(&self) -> ResolvedFilter {
        self.resolved
    }

    pub fn set_resolved(&mut self, resolved: ResolvedFilter) {
        self.resolved = resolved;
    }

    /// True when no predicate is active
    pub fn is_unrestricted(&self) -> bool {
        self.selected_tags.is_empty()
            && self.active_keyword().is_none()
            && self.resolved == ResolvedFilter::Any
    }
}

/// Split a comma-separated tag list, dropping blank entries
pub fn split_tag_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let filter = FilterState::from_query_str("tag=os,memory&isResolved=true&keyword=page%20fault");
        assert!(filter.is_selected("os"));
        assert!(filter.is_selected("memory"));
        assert_eq!(filter.resolved(), ResolvedFilter::Resolved);
        assert_eq!(filter.keyword(), "page fault");
    }

    #[test]
    fn test_parse_repeated_tag_params() {
        let filter = FilterState::from_query_str("?tag=os&tag=memory,fs");
        assert_eq!(filter.sorted_tags(), vec!["fs", "memory", "os"]);
    }

    #[test]
    fn test_blank_tag_names_ignored() {
        let filter = FilterState::from_query_str("tag=&tag=,%20,");
        assert!(filter.selected_tags().is_empty());
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn test_unknown_resolved_value_is_unset() {
        assert_eq!(FilterState::from_query_str("isResolved=yes").resolved(), ResolvedFilter::Any);
        assert_eq!(FilterState::from_query_str("isResolved=false").resolved(), ResolvedFilter::Unresolved);
    }

    #[test]
    fn test_whitespace_keyword_inactive() {
        let filter = FilterState::new().with_keyword("   ");
        assert_eq!(filter.active_keyword(), None);
        assert!(filter.is_unrestricted());

        let filter = FilterState::new().with_keyword("  deadlock ");
        assert_eq!(filter.active_keyword(), Some("deadlock"));
    }

    #[test]
    fn test_query_pairs_only_active_predicates() {
        assert!(FilterState::new().with_keyword(" ").to_query_pairs().is_empty());

        let filter = FilterState::new()
            .with_tag("memory")
            .with_tag("os")
            .with_keyword(" leak ")
            .with_resolved(ResolvedFilter::Unresolved);
        assert_eq!(
            filter.to_query_pairs(),
            vec![
                (TAG_PARAM, "memory,os".to_string()),
                (KEYWORD_PARAM, "leak".to_string()),
                (RESOLVED_PARAM, "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_parse_back() {
        let filter = FilterState::new()
            .with_tag("concurrency")
            .with_keyword("mutex")
            .with_resolved(ResolvedFilter::Resolved);
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(filter.to_query_pairs())
            .finish();
        assert_eq!(FilterState::from_query_str(&encoded), filter);
    }

    #[test]
    fn test_toggle_tag() {
        let mut filter = FilterState::new();
        assert!(filter.toggle_tag("os"));
        assert!(filter.is_selected("os"));
        assert!(!filter.toggle_tag("os"));
        assert!(!filter.is_selected("os"));
    }
}
