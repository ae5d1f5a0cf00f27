//! Document database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{now, push_field, timestamp};
use crate::error::Result;
use crate::patch::Field;

/// Document record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub source_type: Option<String>,
    pub source_url: Option<String>,
    pub page_count: Option<i64>,
    pub last_opened_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create document request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocument {
    pub title: Option<String>,
    pub source_type: Option<String>,
    pub source_url: Option<String>,
    pub page_count: Option<i64>,
    pub last_opened_at: Option<DateTime<Utc>>,
}

/// Partial document update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub source_type: Field<String>,
    #[serde(default)]
    pub source_url: Field<String>,
    #[serde(default)]
    pub page_count: Field<i64>,
    #[serde(default)]
    pub last_opened_at: Field<DateTime<Utc>>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        !(self.title.is_present()
            || self.source_type.is_present()
            || self.source_url.is_present()
            || self.page_count.is_present()
            || self.last_opened_at.is_present())
    }
}

/// Document repository
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a document only if it belongs to the user
    pub async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, user_id, title, source_type, source_url, page_count,
                   last_opened_at, created_at, updated_at
            FROM documents
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    /// List all documents owned by a user
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, user_id, title, source_type, source_url, page_count,
                   last_opened_at, created_at, updated_at
            FROM documents
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Create a new document
    pub async fn create(&self, user_id: &str, data: &CreateDocument) -> Result<Document> {
        let id = Uuid::new_v4().to_string();
        let now = now();

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, user_id, title, source_type, source_url, page_count, last_opened_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, title, source_type, source_url, page_count,
                      last_opened_at, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&data.title)
        .bind(&data.source_type)
        .bind(&data.source_url)
        .bind(data.page_count)
        .bind(data.last_opened_at.as_ref().map(timestamp))
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await?;

        Ok(document)
    }

    /// Apply a partial update to a document the user owns
    ///
    /// Returns `None` when no owned row matched.
    pub async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        patch: &DocumentPatch,
    ) -> Result<Option<Document>> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE documents SET ");
        {
            let mut set = query.separated(", ");
            set.push("updated_at = ").push_bind_unseparated(now());
            push_field(&mut set, "title", patch.title.clone());
            push_field(&mut set, "source_type", patch.source_type.clone());
            push_field(&mut set, "source_url", patch.source_url.clone());
            push_field(&mut set, "page_count", patch.page_count.clone());
            push_field(
                &mut set,
                "last_opened_at",
                patch.last_opened_at.as_ref().map(timestamp),
            );
        }
        query
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND user_id = ")
            .push_bind(user_id.to_string())
            .push(
                " RETURNING id, user_id, title, source_type, source_url, page_count, \
                 last_opened_at, created_at, updated_at",
            );

        let document = query
            .build_query_as::<Document>()
            .fetch_optional(self.pool)
            .await?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_find_owned_requires_matching_user() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);
        let doc = repo.create("alice", &CreateDocument::default()).await.unwrap();

        assert!(repo.find_owned(&doc.id, "alice").await.unwrap().is_some());
        assert!(repo.find_owned(&doc.id, "bob").await.unwrap().is_none());
        assert!(repo.find_owned("missing", "alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_null_clears_and_absent_keeps() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);
        let doc = repo
            .create(
                "alice",
                &CreateDocument {
                    title: Some("Paper".to_string()),
                    source_type: Some("upload".to_string()),
                    page_count: Some(12),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let patch = DocumentPatch {
            title: Field::Null,
            page_count: Field::Value(13),
            ..Default::default()
        };
        let updated = repo
            .update_owned(&doc.id, "alice", &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, None);
        assert_eq!(updated.page_count, Some(13));
        assert_eq!(updated.source_type.as_deref(), Some("upload"));
        assert_eq!(updated.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn test_update_other_users_document_matches_nothing() {
        let pool = test_pool().await;
        let repo = DocumentRepository::new(&pool);
        let doc = repo.create("alice", &CreateDocument::default()).await.unwrap();

        let patch = DocumentPatch {
            title: Field::Value("stolen".to_string()),
            ..Default::default()
        };
        assert!(repo.update_owned(&doc.id, "bob", &patch).await.unwrap().is_none());

        let unchanged = repo.find_owned(&doc.id, "alice").await.unwrap().unwrap();
        assert_eq!(unchanged.title, None);
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(DocumentPatch::default().is_empty());
        let patch = DocumentPatch {
            source_url: Field::Null,
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
