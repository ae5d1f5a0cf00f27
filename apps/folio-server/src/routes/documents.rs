//! Document action routes

use axum::{extract::State, routing::post, Json, Router};

use super::ActionInput;
use crate::actions::documents::{self, DocumentList, GetDocumentInput, UpdateDocumentInput};
use crate::actions::Envelope;
use crate::auth::RequestContext;
use crate::db::{CreateDocument, Document};
use crate::error::Result;
use crate::state::AppState;

/// Create the document actions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createDocument", post(create_document))
        .route("/updateDocument", post(update_document))
        .route("/listDocuments", post(list_documents))
        .route("/getDocument", post(get_document))
}

async fn create_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<CreateDocument>,
) -> Result<Json<Envelope<Document>>> {
    Ok(Json(documents::create(state.db(), &ctx, input).await?))
}

async fn update_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<UpdateDocumentInput>,
) -> Result<Json<Envelope<Document>>> {
    Ok(Json(documents::update(state.db(), &ctx, input).await?))
}

/// Takes no input; any request body is ignored
async fn list_documents(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Envelope<DocumentList>>> {
    Ok(Json(documents::list(state.db(), &ctx).await?))
}

async fn get_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<GetDocumentInput>,
) -> Result<Json<Envelope<Document>>> {
    Ok(Json(documents::get(state.db(), &ctx, input).await?))
}
