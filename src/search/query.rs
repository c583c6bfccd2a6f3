//! SQL construction for question search
//!
//! All user-provided values are bound as parameters; only fixed SQL
//! fragments are pushed as text.

use sqlx::{QueryBuilder, Sqlite};

use crate::forum::QuestionId;

use super::predicate::{FilterPlan, Predicate};

const SELECT_QUESTIONS: &str =
    "SELECT q.id, q.title, q.content, q.created_at, q.is_resolved FROM questions q";

/// Newest first; id breaks ties so the order is total
const ORDER_NEWEST_FIRST: &str = " ORDER BY q.created_at DESC, q.id DESC";

const SELECT_TAGS_FOR_QUESTIONS: &str = "SELECT qt.question_id, t.id, t.name \
     FROM question_tags qt JOIN tags t ON t.id = qt.tag_id \
     WHERE qt.question_id IN (";

/// Build the filtered question query for a plan
pub fn search_query(plan: &FilterPlan) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(SELECT_QUESTIONS);

    for (i, predicate) in plan.predicates().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(&mut builder, predicate);
    }

    builder.push(ORDER_NEWEST_FIRST);
    builder
}

fn push_predicate(builder: &mut QueryBuilder<'static, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::AnyTag(names) => {
            // One JSON array parameter however many tags are selected
            builder
                .push(
                    "EXISTS (SELECT 1 FROM question_tags qt JOIN tags t ON t.id = qt.tag_id \
                     WHERE qt.question_id = q.id AND t.name IN (SELECT value FROM json_each(",
                )
                .push_bind(serde_json::Value::from(names.clone()).to_string())
                .push(")))");
        }
        Predicate::Resolved(flag) => {
            builder.push("q.is_resolved = ").push_bind(*flag);
        }
        Predicate::Keyword(needle) => {
            builder
                .push("(instr(q.title_folded, ")
                .push_bind(needle.clone())
                .push(") > 0 OR instr(q.content_folded, ")
                .push_bind(needle.clone())
                .push(") > 0)");
        }
    }
}

/// Tags of a batch of questions. `ids` must be non-empty.
pub fn tags_query(ids: &[QuestionId]) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(SELECT_TAGS_FOR_QUESTIONS);
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(id.0);
    }
    list.push_unseparated(") ORDER BY t.name");
    builder
}
