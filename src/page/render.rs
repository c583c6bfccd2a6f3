//! Markdown rendering of the search page and question detail

use chrono::{DateTime, Utc};

use crate::forum::Question;
use crate::search::ResolvedFilter;

use super::state::{SearchPage, SearchStatus};

pub const EMPTY_RESULTS: &str = "No questions matched the current filters.";

/// Markdown-to-HTML collaborator. Sanitization is its own concern.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Leaves question content as written
pub struct PassthroughRenderer;

impl MarkdownRenderer for PassthroughRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// `2024年06月01日 10:05`
pub fn format_created_at(at: &DateTime<Utc>) -> String {
    at.format("%Y年%m月%d日 %H:%M").to_string()
}

/// Render the whole page: filter summary, status, then the result list
pub fn render_page(page: &SearchPage, renderer: &dyn MarkdownRenderer) -> String {
    let mut out = String::from("## Question search\n\n");
    out.push_str(&filter_summary(page));
    out.push_str(&format!("\n[{}]\n\n", page.search_button_label()));

    match page.status() {
        SearchStatus::Idle => out.push_str("Choose filters and run a search.\n"),
        SearchStatus::Loading => out.push_str("Searching...\n"),
        SearchStatus::Error(message) => {
            out.push_str(&format!("**Error:** {}. You can try again.\n", message));
        }
        SearchStatus::Loaded if page.questions().is_empty() => {
            out.push_str(EMPTY_RESULTS);
            out.push('\n');
        }
        SearchStatus::Loaded => {
            out.push_str(&format!("Found {} question(s)\n\n", page.questions().len()));
            for question in page.questions() {
                out.push_str(&render_question(question, renderer));
                out.push_str("\n---\n\n");
            }
        }
    }

    out
}

/// One result entry, linking to the detail page
pub fn render_question(question: &Question, renderer: &dyn MarkdownRenderer) -> String {
    let mut out = format!("### [{}](/question/{})\n\n", question.title, question.id);
    let body = renderer.render(&question.content);
    if !body.trim().is_empty() {
        out.push_str(body.trim_end());
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        "_{}_ · {}\n",
        format_created_at(&question.created_at),
        resolved_label(question.is_resolved)
    ));
    if !question.tags.is_empty() {
        let chips: Vec<String> = question.tags.iter().map(|t| format!("`{}`", t.name)).collect();
        out.push_str(&chips.join(" "));
        out.push('\n');
    }
    out
}

/// Full question view for the detail command
pub fn render_question_detail(question: &Question, renderer: &dyn MarkdownRenderer) -> String {
    let mut out = format!("# {}\n\n", question.title);
    out.push_str(&format!(
        "Asked {} · {}\n",
        format_created_at(&question.created_at),
        resolved_label(question.is_resolved)
    ));
    if !question.tags.is_empty() {
        let names: Vec<&str> = question.tags.iter().map(|t| t.name.as_str()).collect();
        out.push_str(&format!("Tags: {}\n", names.join(", ")));
    }
    out.push('\n');
    out.push_str(&renderer.render(&question.content));
    out.push('\n');
    out
}

fn resolved_label(resolved: bool) -> &'static str {
    if resolved {
        "Resolved"
    } else {
        "Unresolved"
    }
}

fn filter_summary(page: &SearchPage) -> String {
    let filter = page.filter();
    let keyword = filter.active_keyword().unwrap_or("(any)");
    let tags = if filter.selected_tags().is_empty() {
        "(any)".to_string()
    } else {
        filter.sorted_tags().join(", ")
    };
    let status = match filter.resolved() {
        ResolvedFilter::Any => "(any)",
        ResolvedFilter::Resolved => "resolved",
        ResolvedFilter::Unresolved => "unresolved",
    };
    format!("Keyword: {} | Tags: {} | Status: {}\n", keyword, tags, status)
}
