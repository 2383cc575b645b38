use axum::response::IntoResponse;
use keyset_core::Error as KeysetError;

use crate::listing::keyset_error_to_problem;
use crate::problem::ProblemResponse;

/// Unified API error type that handles all errors at the API boundary.
///
/// Handlers return `ApiResult<T, D>` and use `?` on both list-engine and
/// domain errors; each variant renders as an RFC 9457 Problem+json response.
#[derive(thiserror::Error, Debug)]
pub enum ApiError<D> {
    /// List query validation, cursor decoding and range-scan failures
    #[error("{error}")]
    Keyset { error: KeysetError, instance: String },

    /// Domain business logic errors
    #[error(transparent)]
    Domain(D),
}

impl<D> ApiError<D> {
    pub fn keyset(error: KeysetError, instance: impl Into<String>) -> Self {
        ApiError::Keyset {
            error,
            instance: instance.into(),
        }
    }

    pub fn from_domain(e: D) -> Self {
        ApiError::Domain(e)
    }
}

impl<D> From<KeysetError> for ApiError<D> {
    fn from(error: KeysetError) -> Self {
        // Fallback instance when the handler has no request path at hand.
        ApiError::keyset(error, "/")
    }
}

impl<D> IntoResponse for ApiError<D>
where
    D: Into<ProblemResponse>,
{
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Keyset { error, instance } => {
                keyset_error_to_problem(&error, &instance).into_response()
            }
            ApiError::Domain(e) => e.into().into_response(),
        }
    }
}

/// Generic Result type for API handlers.
/// Each module typically defines its own alias: `type AuthzResult<T> = ApiResult<T, DomainError>;`
pub type ApiResult<T, D> = Result<T, ApiError<D>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::not_found;
    use axum::http::StatusCode;

    #[derive(Debug, thiserror::Error)]
    #[error("gone")]
    struct Gone;

    impl From<Gone> for ProblemResponse {
        fn from(_: Gone) -> Self {
            not_found("gone")
        }
    }

    #[test]
    fn keyset_errors_render_as_problems() {
        let err: ApiError<Gone> = ApiError::keyset(KeysetError::invalid_cursor("bad"), "/v1/users");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError<Gone> = KeysetError::storage("down").into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_errors_use_their_own_mapping() {
        let err: ApiError<Gone> = ApiError::from_domain(Gone);
        assert_eq!(err.to_string(), "gone");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
