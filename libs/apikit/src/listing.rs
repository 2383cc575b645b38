//! List-endpoint plumbing: query extractor and keyset error mapping.

use std::ops::Deref;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use keyset_core::{Error as KeysetError, ListParams};

use crate::problem::{Problem, ProblemResponse, ValidationError};

/// Map keyset engine errors to RFC 9457 Problem responses.
///
/// Validation failures are 400 with a code naming the failure; storage
/// failures are 500 and never leak the underlying message.
pub fn keyset_error_to_problem(e: &KeysetError, instance: &str) -> ProblemResponse {
    match e {
        KeysetError::InvalidParameter { param, reason } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Invalid Parameter",
            format!("{param}: {reason}"),
        )
        .with_code(e.code())
        .with_instance(instance)
        .with_errors(vec![ValidationError {
            detail: reason.clone(),
            pointer: (*param).to_owned(),
        }])
        .into(),
        // Surfaced on its own only outside cursor decoding (e.g. a bad filter value).
        KeysetError::InvalidSortValue { field, reason } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Invalid Parameter",
            format!("{field}: {reason}"),
        )
        .with_code("INVALID_PARAMETER")
        .with_instance(instance)
        .into(),
        KeysetError::InvalidCursor(reason) => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Cursor", reason.clone())
                .with_code(e.code())
                .with_instance(instance)
                .into()
        }
        KeysetError::Storage(reason) => {
            tracing::error!(error = %reason, instance, "range scan failed");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Storage Failure",
                "The listing could not be completed",
            )
            .with_code(e.code())
            .with_instance(instance)
            .into()
        }
    }
}

/// Axum extractor for raw list parameters.
///
/// Usage in handlers:
///   async fn list_roles(Listing(params): Listing, /* ... */) { /* validate against a catalog */ }
#[derive(Debug, Clone, Default)]
pub struct Listing(pub ListParams);

impl Listing {
    #[inline]
    pub fn into_inner(self) -> ListParams {
        self.0
    }
}

impl Deref for Listing {
    type Target = ListParams;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Listing> for ListParams {
    #[inline]
    fn from(x: Listing) -> Self {
        x.0
    }
}

impl<S> FromRequestParts<S> for Listing
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_owned();
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                Problem::new(
                    StatusCode::BAD_REQUEST,
                    "Invalid Parameter",
                    rejection.body_text(),
                )
                .with_code("INVALID_PARAMETER")
                .with_instance(path)
            })?;
        Ok(Listing(params))
    }
}
