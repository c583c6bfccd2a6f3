//! Search page: filter controls, request lifecycle and result rendering

pub mod render;
pub mod source;
pub mod state;

pub use render::{render_page, render_question_detail, MarkdownRenderer, PassthroughRenderer};
pub use source::QuestionSource;
pub use state::{Controls, PageError, SearchPage, SearchStatus};
