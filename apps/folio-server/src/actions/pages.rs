//! Page actions

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::Envelope;
use crate::auth::{require_authenticated_user, RequestContext};
use crate::db::{CreatePage, Page, PageRepository};
use crate::error::Result;
use crate::guard::require_owned_document;
use crate::validation::{require_at_least, require_non_empty, Validate};

/// listPages input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPagesInput {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct PageList {
    pub pages: Vec<Page>,
    pub total: usize,
}

impl Validate for CreatePage {
    fn validate(&self) -> Result<()> {
        require_non_empty("documentId", &self.document_id)?;
        require_at_least("pageNumber", self.page_number, 1)
    }
}

impl Validate for ListPagesInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("documentId", &self.document_id)
    }
}

/// Store a page of an owned document
///
/// Page numbers are not deduplicated.
pub async fn create(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: CreatePage,
) -> Result<Envelope<Page>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    let page = PageRepository::new(pool).create(&input).await?;
    tracing::info!(
        page_id = %page.id,
        document_id = %page.document_id,
        page_number = page.page_number,
        "Created page"
    );

    Ok(Envelope::ok(page))
}

/// List the pages of an owned document
pub async fn list(
    pool: &SqlitePool,
    ctx: &RequestContext,
    input: ListPagesInput,
) -> Result<Envelope<PageList>> {
    input.validate()?;
    let user = require_authenticated_user(ctx)?;
    require_owned_document(pool, &input.document_id, &user.id).await?;

    let pages = PageRepository::new(pool)
        .list_for_document(&input.document_id)
        .await?;
    let total = pages.len();

    Ok(Envelope::ok(PageList { pages, total }))
}
