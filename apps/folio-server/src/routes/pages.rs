//! Page action routes

use axum::{extract::State, routing::post, Json, Router};

use super::ActionInput;
use crate::actions::pages::{self, ListPagesInput, PageList};
use crate::actions::Envelope;
use crate::auth::RequestContext;
use crate::db::{CreatePage, Page};
use crate::error::Result;
use crate::state::AppState;

/// Create the page actions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createPage", post(create_page))
        .route("/listPages", post(list_pages))
}

async fn create_page(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<CreatePage>,
) -> Result<Json<Envelope<Page>>> {
    Ok(Json(pages::create(state.db(), &ctx, input).await?))
}

async fn list_pages(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<ListPagesInput>,
) -> Result<Json<Envelope<PageList>>> {
    Ok(Json(pages::list(state.db(), &ctx, input).await?))
}
