//! Active filter predicates
//!
//! A [`FilterPlan`] is the list of predicates a [`FilterState`] turns on.
//! Every predicate in the plan must hold for a question to match; an empty
//! plan matches everything. The plan is rendered to SQL by
//! [`super::query`] and can also be evaluated directly against a question.

use crate::forum::Question;

use super::filter::FilterState;

/// One restriction on the result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Question carries at least one of these tag names (sorted, non-empty)
    AnyTag(Vec<String>),
    Resolved(bool),
    /// Needle is already case-folded; matches title or content
    Keyword(String),
}

impl Predicate {
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            Predicate::AnyTag(names) => names.iter().any(|name| question.has_tag(name)),
            Predicate::Resolved(flag) => question.is_resolved == *flag,
            Predicate::Keyword(needle) => {
                fold_case(&question.title).contains(needle.as_str())
                    || fold_case(&question.content).contains(needle.as_str())
            }
        }
    }
}

/// Case folding used on both sides of the keyword comparison.
///
/// Unicode-aware (`Ü`/`ü`, fullwidth `Ｏ`/`ｏ`). The store keeps folded copies
/// of title and content written with this same function, since SQLite's
/// `lower()` only folds ASCII.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Conjunction of the predicates a filter activates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPlan {
    predicates: Vec<Predicate>,
}

impl FilterPlan {
    pub fn from_filter(filter: &FilterState) -> Self {
        let mut predicates = Vec::with_capacity(3);

        if !filter.selected_tags().is_empty() {
            let names = filter.sorted_tags().into_iter().map(str::to_string).collect();
            predicates.push(Predicate::AnyTag(names));
        }

        if let Some(flag) = filter.resolved().as_bool() {
            predicates.push(Predicate::Resolved(flag));
        }

        if let Some(keyword) = filter.active_keyword() {
            predicates.push(Predicate::Keyword(fold_case(keyword)));
        }

        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_unrestricted(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, question: &Question) -> bool {
        self.predicates.iter().all(|p| p.matches(question))
    }
}
