//! Annotation actions
//!
//! Annotations hang off a document and optionally one of its pages. Every
//! action re-checks document ownership first; listing returns all
//! annotations on the document, whoever wrote them.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::Envelope;
use crate::auth::{require_authenticated_user, RequestContext};
use crate::db::{Annotation, AnnotationPatch, AnnotationRepository, CreateAnnotation};
use crate::error::Result;
use crate::guard::{annotation_not_found, require_owned_document, require_owned_page};
use crate::validation::{
    check_field, require_non_empty, require_optional_non_empty, require_patch, Validate,
};

/// updateAnnotation input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnotationInput {
    pub id: String,
    pub document_id: String,
    #[serde(flatten)]
    pub patch: AnnotationPatch,
}

/// deleteAnnotation input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAnnotationInput {
    pub id: String,
    pub document_id: String,
}

/// listAnnotations input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnotationsInput {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct AnnotationList {
    pub annotations: Vec<Annotation>,
    pub total: usize,
}

impl Validate for CreateAnnotation {
    fn validate(&self) -> Result<()> {
        require_non_empty("documentId", &self.document_id)?;
        require_optional_non_empty("pageId", self.page_id.as_ref())
    }
}

impl Validate for UpdateAnnotationInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("id", &self.id)?;
        require_non_empty("documentId", &self.document_id)?;
        require_patch(self.patch.is_empty())?;
        check_field(&self.patch.page_id, |page_id| require_non_empty("pageId", page_id))
    }
}

impl Validate for DeleteAnnotationInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("id", &self.id)?;
        require_non_empty("documentId", &self.document_id)
    }
}

impl Validate for ListAnnotationsInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("documentId", &self.document_id)
    }
}

/// Create an annotation on an owned document
pub async fn create(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: CreateAnnotation,
) -> Result<Envelope<Annotation>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    if let Some(page_id) = &input.page_id {
        require_owned_page(pool, page_id, &input.document_id, &user.id).await?;
    }

    let annotation = AnnotationRepository::new(pool).create(&user.id, &input).await?;
    tracing::info!(
        annotation_id = %annotation.id,
        document_id = %annotation.document_id,
        "Created annotation"
    );

    Ok(Envelope::ok(annotation))
}

/// Patch the supplied fields of an annotation
pub async fn update(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: UpdateAnnotationInput,
) -> Result<Envelope<Annotation>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    // A null pageId detaches the annotation and needs no check.
    if let Some(page_id) = input.patch.page_id.value() {
        require_owned_page(pool, page_id, &input.document_id, &user.id).await?;
    }

    let repo = AnnotationRepository::new(pool);
    repo.find_in_document(&input.id, &input.document_id)
        .await?
        .ok_or_else(|| annotation_not_found(&input.id))?;

    let annotation = repo
        .update_in_document(&input.id, &input.document_id, &input.patch)
        .await?
        .ok_or_else(|| annotation_not_found(&input.id))?;
    tracing::info!(annotation_id = %annotation.id, "Updated annotation");

    Ok(Envelope::ok(annotation))
}

/// Delete an annotation of an owned document
pub async fn delete(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: DeleteAnnotationInput,
) -> Result<Envelope<()>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    let deleted = AnnotationRepository::new(pool)
        .delete_in_document(&input.id, &input.document_id)
        .await?;
    if !deleted {
        return Err(annotation_not_found(&input.id));
    }
    tracing::info!(annotation_id = %input.id, "Deleted annotation");

    Ok(Envelope::done())
}

/// List all annotations on an owned document
pub async fn list(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: ListAnnotationsInput,
) -> Result<Envelope<AnnotationList>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    let annotations = AnnotationRepository::new(pool)
        .list_for_document(&input.document_id)
        .await?;
    let total = annotations.len();

    Ok(Envelope::ok(AnnotationList { annotations, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{documents, pages};
    use crate::db::{test_pool, CreateDocument, CreatePage, Page};
    use crate::error::AppError;
    use crate::patch::Field;

    struct Fixture {
        pool: SqlitePool,
        ctx: RequestContext,
        document_id: String,
        page: Page,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let ctx = RequestContext::authenticated("alice");
        let document_id = documents::create(&pool, &ctx, CreateDocument::default())
            .await
            .unwrap()
            .into_data()
            .unwrap()
            .id;
        let page = pages::create(
            &pool,
            &ctx,
            CreatePage {
                document_id: document_id.clone(),
                page_number: 1,
                text_content: Some("Lorem ipsum".to_string()),
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();

        Fixture {
            pool,
            ctx,
            document_id,
            page,
        }
    }

    fn highlight(document_id: &str, page_id: Option<&str>) -> CreateAnnotation {
        CreateAnnotation {
            document_id: document_id.to_string(),
            page_id: page_id.map(str::to_string),
            annotation_type: Some("highlight".to_string()),
            selection_json: Some(r#"{"start":0,"end":5}"#.to_string()),
            comment: None,
            color: Some("#ffeb3b".to_string()),
        }
    }

    fn patch_comment(id: &str, document_id: &str, comment: &str) -> UpdateAnnotationInput {
        UpdateAnnotationInput {
            id: id.to_string(),
            document_id: document_id.to_string(),
            patch: AnnotationPatch {
                comment: Field::Value(comment.to_string()),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let f = fixture().await;

        let created = create(&f.pool, &f.ctx, highlight(&f.document_id, Some(&f.page.id)))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.page_id.as_deref(), Some(f.page.id.as_str()));

        let updated = update(&f.pool, &f.ctx, patch_comment(&created.id, &f.document_id, "note"))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(updated.comment.as_deref(), Some("note"));
        assert_eq!(updated.annotation_type, created.annotation_type);
        assert_eq!(updated.selection_json, created.selection_json);
        assert_eq!(updated.color, created.color);
        assert_eq!(updated.page_id, created.page_id);

        let deleted = delete(
            &f.pool,
            &f.ctx,
            DeleteAnnotationInput {
                id: created.id.clone(),
                document_id: f.document_id.clone(),
            },
        )
        .await
        .unwrap();
        assert!(deleted.success);
        assert!(deleted.data.is_none());

        let listing = list(
            &f.pool,
            &f.ctx,
            ListAnnotationsInput {
                document_id: f.document_id.clone(),
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();
        assert_eq!(listing.total, 0);
        assert!(listing.annotations.is_empty());
    }

    #[tokio::test]
    async fn test_page_from_other_document_is_rejected() {
        let f = fixture().await;
        let other_document = documents::create(&f.pool, &f.ctx, CreateDocument::default())
            .await
            .unwrap()
            .into_data()
            .unwrap();

        let err = create(&f.pool, &f.ctx, highlight(&other_document.id, Some(&f.page.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let f = fixture().await;
        let created = create(&f.pool, &f.ctx, highlight(&f.document_id, None))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        let input = DeleteAnnotationInput {
            id: created.id,
            document_id: f.document_id.clone(),
        };

        delete(&f.pool, &f.ctx, input.clone()).await.unwrap();
        let err = delete(&f.pool, &f.ctx, input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_without_fields_is_invalid() {
        let f = fixture().await;
        let input = UpdateAnnotationInput {
            id: "a".to_string(),
            document_id: f.document_id.clone(),
            patch: AnnotationPatch::default(),
        };

        let err = update(&f.pool, &f.ctx, input).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_cannot_cross_documents() {
        let f = fixture().await;
        let created = create(&f.pool, &f.ctx, highlight(&f.document_id, None))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        let other_document = documents::create(&f.pool, &f.ctx, CreateDocument::default())
            .await
            .unwrap()
            .into_data()
            .unwrap();

        let err = update(
            &f.pool,
            &f.ctx,
            patch_comment(&created.id, &other_document.id, "moved"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_page_reference() {
        let f = fixture().await;
        let created = create(&f.pool, &f.ctx, highlight(&f.document_id, Some(&f.page.id)))
            .await
            .unwrap()
            .into_data()
            .unwrap();

        // Detach from the page
        let detached = update(
            &f.pool,
            &f.ctx,
            UpdateAnnotationInput {
                id: created.id.clone(),
                document_id: f.document_id.clone(),
                patch: AnnotationPatch {
                    page_id: Field::Null,
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();
        assert_eq!(detached.page_id, None);

        // Unknown page is rejected
        let err = update(
            &f.pool,
            &f.ctx,
            UpdateAnnotationInput {
                id: created.id.clone(),
                document_id: f.document_id.clone(),
                patch: AnnotationPatch {
                    page_id: Field::Value("ghost".to_string()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_document_looks_missing() {
        let f = fixture().await;
        let created = create(&f.pool, &f.ctx, highlight(&f.document_id, None))
            .await
            .unwrap()
            .into_data()
            .unwrap();
        let mallory = RequestContext::authenticated("mallory");

        let foreign = update(
            &f.pool,
            &mallory,
            patch_comment(&created.id, &f.document_id, "x"),
        )
        .await
        .unwrap_err();
        let missing = update(&f.pool, &mallory, patch_comment(&created.id, "nope", "x"))
            .await
            .unwrap_err();
        assert_eq!(foreign.code(), "NOT_FOUND");
        assert_eq!(foreign.code(), missing.code());

        let err = list(
            &f.pool,
            &mallory,
            ListAnnotationsInput {
                document_id: f.document_id.clone(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_includes_all_authors() {
        let f = fixture().await;
        create(&f.pool, &f.ctx, highlight(&f.document_id, None))
            .await
            .unwrap();

        // Simulate an annotation authored by someone else on the same document
        let mut foreign = highlight(&f.document_id, None);
        foreign.comment = Some("imported".to_string());
        AnnotationRepository::new(&f.pool)
            .create("collaborator", &foreign)
            .await
            .unwrap();

        let listing = list(
            &f.pool,
            &f.ctx,
            ListAnnotationsInput {
                document_id: f.document_id.clone(),
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();
        assert_eq!(listing.total, 2);
        assert!(listing.annotations.iter().any(|a| a.user_id == "collaborator"));
    }
}
