//! Annotation action routes

use axum::{extract::State, routing::post, Json, Router};

use super::ActionInput;
use crate::actions::annotations::{
    self, AnnotationList, DeleteAnnotationInput, ListAnnotationsInput, UpdateAnnotationInput,
};
use crate::actions::Envelope;
use crate::auth::RequestContext;
use crate::db::{Annotation, CreateAnnotation};
use crate::error::Result;
use crate::state::AppState;

/// Create the annotation actions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createAnnotation", post(create_annotation))
        .route("/updateAnnotation", post(update_annotation))
        .route("/deleteAnnotation", post(delete_annotation))
        .route("/listAnnotations", post(list_annotations))
}

async fn create_annotation(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<CreateAnnotation>,
) -> Result<Json<Envelope<Annotation>>> {
    Ok(Json(annotations::create(state.db(), &ctx, input).await?))
}

async fn update_annotation(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<UpdateAnnotationInput>,
) -> Result<Json<Envelope<Annotation>>> {
    Ok(Json(annotations::update(state.db(), &ctx, input).await?))
}

async fn delete_annotation(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<DeleteAnnotationInput>,
) -> Result<Json<Envelope<()>>> {
    Ok(Json(annotations::delete(state.db(), &ctx, input).await?))
}

async fn list_annotations(
    State(state): State<AppState>,
    ctx: RequestContext,
    ActionInput(input): ActionInput<ListAnnotationsInput>,
) -> Result<Json<Envelope<AnnotationList>>> {
    Ok(Json(annotations::list(state.db(), &ctx, input).await?))
}
