//! Table definitions, applied in order at startup

pub const SCHEMA: &[(&str, &str)] = &[
    (
        "questions table",
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            title_folded TEXT NOT NULL,
            content_folded TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            is_resolved INTEGER NOT NULL DEFAULT 0
        )
        "#,
    ),
    (
        "tags table",
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    ),
    (
        "question_tags table",
        r#"
        CREATE TABLE IF NOT EXISTS question_tags (
            question_id INTEGER NOT NULL REFERENCES questions(id),
            tag_id INTEGER NOT NULL REFERENCES tags(id),
            PRIMARY KEY (question_id, tag_id)
        )
        "#,
    ),
    (
        "created_at index",
        "CREATE INDEX IF NOT EXISTS idx_questions_created_at ON questions(created_at)",
    ),
    (
        "tag lookup index",
        "CREATE INDEX IF NOT EXISTS idx_question_tags_tag ON question_tags(tag_id)",
    ),
];
