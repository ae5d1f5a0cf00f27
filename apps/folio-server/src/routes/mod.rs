//! Route modules for Folio Server
//!
//! Actions are named procedures, not resources: every one is a
//! `POST /api/actions/<name>` taking a JSON object.

pub mod annotations;
pub mod documents;
pub mod health;
pub mod pages;

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json, Router,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Create the actions router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(documents::router())
        .merge(pages::router())
        .merge(annotations::router())
}

/// JSON action input whose decoding failures surface as `InvalidInput`
pub struct ActionInput<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ActionInput<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;

        Ok(ActionInput(value))
    }
}
