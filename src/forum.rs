//! Forum records: questions and the tags attached to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Question identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(QuestionId)
            .map_err(|_| AppError::NotFound(format!("Question {} does not exist", s)))
    }
}

/// Topic label. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A posted question with its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    /// Markdown source
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_resolved: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Question {
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}

/// Input for the question-submission path (seeding and tests)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub title: String,
    pub content: String,
    /// Defaults to now when absent
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewQuestion {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: None,
            is_resolved: false,
            tags: Vec::new(),
        }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn resolved(mut self, resolved: bool) -> Self {
        self.is_resolved = resolved;
        self
    }

    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(name.into());
        self
    }

    /// Reject blank titles. Content may be empty.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Question title cannot be empty".to_string()));
        }
        if self.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::InvalidInput("Tag names cannot be empty".to_string()));
        }
        Ok(())
    }
}
