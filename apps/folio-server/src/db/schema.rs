//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Documents table (PDF metadata; the file itself lives in object storage)
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT,
    -- Free-form tag: 'upload', 'url', ...
    source_type TEXT,
    -- Storage key or remote URL
    source_url TEXT,
    page_count INTEGER CHECK (page_count IS NULL OR page_count >= 0),
    last_opened_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_user_id ON documents(user_id);

-- Pages table (extracted text per page)
-- (document_id, page_number) is intentionally not unique
CREATE TABLE IF NOT EXISTS pages (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    page_number INTEGER NOT NULL CHECK (page_number >= 1),
    text_content TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_document_id ON pages(document_id);

-- Annotations table (highlights, notes, underlines)
CREATE TABLE IF NOT EXISTS annotations (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    page_id TEXT REFERENCES pages(id),
    -- Author, denormalized for filtering without a join
    user_id TEXT NOT NULL,
    annotation_type TEXT,
    -- Opaque serialized selection geometry
    selection_json TEXT,
    comment TEXT,
    color TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_annotations_document_id ON annotations(document_id);
CREATE INDEX IF NOT EXISTS idx_annotations_page_id ON annotations(page_id);
CREATE INDEX IF NOT EXISTS idx_annotations_user_id ON annotations(user_id);
"#;
