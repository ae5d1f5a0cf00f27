//! Annotation database operations

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{now, push_field};
use crate::error::Result;
use crate::patch::Field;

/// Annotation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub document_id: String,
    pub page_id: Option<String>,
    pub user_id: String,
    pub annotation_type: Option<String>,
    pub selection_json: Option<String>,
    pub comment: Option<String>,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create annotation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotation {
    pub document_id: String,
    pub page_id: Option<String>,
    pub annotation_type: Option<String>,
    pub selection_json: Option<String>,
    pub comment: Option<String>,
    pub color: Option<String>,
}

/// Partial annotation update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(default)]
    pub page_id: Field<String>,
    #[serde(default)]
    pub annotation_type: Field<String>,
    #[serde(default)]
    pub selection_json: Field<String>,
    #[serde(default)]
    pub comment: Field<String>,
    #[serde(default)]
    pub color: Field<String>,
}

impl AnnotationPatch {
    pub fn is_empty(&self) -> bool {
        !(self.page_id.is_present()
            || self.annotation_type.is_present()
            || self.selection_json.is_present()
            || self.comment.is_present()
            || self.color.is_present())
    }
}

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an annotation only if it belongs to the document
    pub async fn find_in_document(
        &self,
        id: &str,
        document_id: &str,
    ) -> Result<Option<Annotation>> {
        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, document_id, page_id, user_id, annotation_type,
                   selection_json, comment, color, created_at, updated_at
            FROM annotations
            WHERE id = ? AND document_id = ?
            "#,
        )
        .bind(id)
        .bind(document_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(annotation)
    }

    /// List every annotation on a document, regardless of author
    pub async fn list_for_document(&self, document_id: &str) -> Result<Vec<Annotation>> {
        let annotations = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, document_id, page_id, user_id, annotation_type,
                   selection_json, comment, color, created_at, updated_at
            FROM annotations
            WHERE document_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// Create a new annotation
    pub async fn create(&self, user_id: &str, data: &CreateAnnotation) -> Result<Annotation> {
        let id = Uuid::new_v4().to_string();
        let now = now();

        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            INSERT INTO annotations (id, document_id, page_id, user_id, annotation_type, selection_json, comment, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, document_id, page_id, user_id, annotation_type,
                      selection_json, comment, color, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(&data.document_id)
        .bind(&data.page_id)
        .bind(user_id)
        .bind(&data.annotation_type)
        .bind(&data.selection_json)
        .bind(&data.comment)
        .bind(&data.color)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool)
        .await?;

        Ok(annotation)
    }

    /// Apply a partial update to an annotation of the document
    pub async fn update_in_document(
        &self,
        id: &str,
        document_id: &str,
        patch: &AnnotationPatch,
    ) -> Result<Option<Annotation>> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE annotations SET ");
        {
            let mut set = query.separated(", ");
            set.push("updated_at = ").push_bind_unseparated(now());
            push_field(&mut set, "page_id", patch.page_id.clone());
            push_field(&mut set, "annotation_type", patch.annotation_type.clone());
            push_field(&mut set, "selection_json", patch.selection_json.clone());
            push_field(&mut set, "comment", patch.comment.clone());
            push_field(&mut set, "color", patch.color.clone());
        }
        query
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND document_id = ")
            .push_bind(document_id.to_string())
            .push(
                " RETURNING id, document_id, page_id, user_id, annotation_type, \
                 selection_json, comment, color, created_at, updated_at",
            );

        let annotation = query
            .build_query_as::<Annotation>()
            .fetch_optional(self.pool)
            .await?;

        Ok(annotation)
    }

    /// Delete an annotation of the document
    pub async fn delete_in_document(&self, id: &str, document_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ? AND document_id = ?")
            .bind(id)
            .bind(document_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
