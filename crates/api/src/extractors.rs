//! Request extractors that reject with [`AppError`] so malformed input gets
//! the same JSON error body as every other failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use issuetrack_core::types::DbId;

use crate::error::AppError;

/// `Json<T>` whose rejection is an [`AppError::BadRequest`].
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// A positive issue id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IssueId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for IssueId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        parse_issue_id(&raw).map(IssueId).ok_or_else(invalid_id)
    }
}

fn parse_issue_id(raw: &str) -> Option<DbId> {
    raw.parse::<DbId>().ok().filter(|id| *id > 0)
}

fn invalid_id() -> AppError {
    AppError::BadRequest("Invalid issue ID".into())
}
