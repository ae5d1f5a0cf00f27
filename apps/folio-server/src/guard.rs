//! Ownership checks
//!
//! Ownership is rooted at the document. A page or annotation is reachable only
//! through a document the caller owns.

use sqlx::SqlitePool;

use crate::db::{Document, DocumentRepository, Page, PageRepository};
use crate::error::{AppError, Result};

pub fn document_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Document not found: {}", id))
}

pub fn page_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Page not found: {}", id))
}

pub fn annotation_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Annotation not found: {}", id))
}

/// Fetch a document the user owns
///
/// Filters on id and owner together, so another user's document is
/// indistinguishable from a missing one.
pub async fn require_owned_document(
    pool: &SqlitePool,
    document_id: &str,
    user_id: &str,
) -> Result<Document> {
    DocumentRepository::new(pool)
        .find_owned(document_id, user_id)
        .await?
        .ok_or_else(|| document_not_found(document_id))
}

/// Fetch a page of a document the user owns
pub async fn require_owned_page(
    pool: &SqlitePool,
    page_id: &str,
    document_id: &str,
    user_id: &str,
) -> Result<Page> {
    require_owned_document(pool, document_id, user_id).await?;

    PageRepository::new(pool)
        .find_in_document(page_id, document_id)
        .await?
        .ok_or_else(|| page_not_found(page_id))
}
