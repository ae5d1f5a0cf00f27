//! Document actions

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::Envelope;
use crate::auth::{require_authenticated_user, RequestContext};
use crate::db::{CreateDocument, Document, DocumentPatch, DocumentRepository};
use crate::error::Result;
use crate::guard::{document_not_found, require_owned_document};
use crate::validation::{check_field, require_at_least, require_non_empty, require_patch, Validate};

/// updateDocument input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentInput {
    pub id: String,
    #[serde(flatten)]
    pub patch: DocumentPatch,
}

/// getDocument input
#[derive(Debug, Clone, Deserialize)]
pub struct GetDocumentInput {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<Document>,
    pub total: usize,
}

impl Validate for CreateDocument {
    fn validate(&self) -> Result<()> {
        if let Some(page_count) = self.page_count {
            require_at_least("pageCount", page_count, 0)?;
        }
        Ok(())
    }
}

impl Validate for UpdateDocumentInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("id", &self.id)?;
        require_patch(self.patch.is_empty())?;
        check_field(&self.patch.page_count, |n| require_at_least("pageCount", *n, 0))
    }
}

impl Validate for GetDocumentInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("id", &self.id)
    }
}

/// Create a document owned by the caller
pub async fn create(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: CreateDocument,
) -> Result<Envelope<Document>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;

    let document = DocumentRepository::new(pool).create(&user.id, &input).await?;
    tracing::info!(document_id = %document.id, user_id = %user.id, "Created document");

    Ok(Envelope::ok(document))
}

/// Patch the supplied fields of an owned document
pub async fn update(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: UpdateDocumentInput,
) -> Result<Envelope<Document>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.id, &user.id).await?;

    let document = DocumentRepository::new(pool)
        .update_owned(&input.id, &user.id, &input.patch)
        .await?
        .ok_or_else(|| document_not_found(&input.id))?;
    tracing::info!(document_id = %document.id, "Updated document");

    Ok(Envelope::ok(document))
}

/// List the caller's documents
pub async fn list(pool: &SqlitePool, ctx: &RequestContext) -> Result<Envelope<DocumentList>> {
    let user = require_authenticated_user(ctx)?;

    let documents = DocumentRepository::new(pool).list_for_user(&user.id).await?;
    let total = documents.len();
    tracing::debug!(user_id = %user.id, total, "Listed documents");

    Ok(Envelope::ok(DocumentList { documents, total }))
}

/// Fetch one owned document
pub async fn get(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: GetDocumentInput,
) -> Result<Envelope<Document>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;

    let document = require_owned_document(pool, &input.id, &user.id).await?;

    Ok(Envelope::ok(document))
}
