//! Page database operations

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::now;
use crate::error::Result;

/// Page record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub document_id: String,
    pub page_number: i64,
    pub text_content: Option<String>,
    pub created_at: String,
}

/// Create page request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    pub document_id: String,
    pub page_number: i64,
    pub text_content: Option<String>,
}

/// Page repository
pub struct PageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a page only if it belongs to the document
    pub async fn find_in_document(&self, id: &str, document_id: &str) -> Result<Option<Page>> {
        let page = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, document_id, page_number, text_content, created_at
            FROM pages
            WHERE id = ? AND document_id = ?
            "#,
        )
        .bind(id)
        .bind(document_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(page)
    }

    /// List pages for a document
    pub async fn list_for_document(&self, document_id: &str) -> Result<Vec<Page>> {
        let pages = sqlx::query_as::<_, Page>(
            r#"
            SELECT id, document_id, page_number, text_content, created_at
            FROM pages
            WHERE document_id = ?
            ORDER BY page_number ASC, created_at ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(self.pool)
        .await?;

        Ok(pages)
    }

    /// Create a new page
    pub async fn create(&self, data: &CreatePage) -> Result<Page> {
        let id = Uuid::new_v4().to_string();

        let page = sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (id, document_id, page_number, text_content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, document_id, page_number, text_content, created_at
            "#,
        )
        .bind(&id)
        .bind(&data.document_id)
        .bind(data.page_number)
        .bind(&data.text_content)
        .bind(now())
        .fetch_one(self.pool)
        .await?;

        Ok(page)
    }
}
