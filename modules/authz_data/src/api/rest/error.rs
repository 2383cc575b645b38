use apikit::{Problem, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 problem response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let problem = match e {
        DomainError::NotFound { kind, id } => Problem::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            format!("{kind} '{id}' was not found"),
        )
        .with_code(format!("{}_NOT_FOUND", kind.code_prefix())),
        DomainError::AlreadyExists { kind, id } => Problem::new(
            StatusCode::CONFLICT,
            "Already Exists",
            format!("{kind} '{id}' already exists"),
        )
        .with_code(format!("{}_ALREADY_EXISTS", kind.code_prefix())),
        DomainError::Validation { field, message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error", e.to_string())
                .with_code("VALIDATION")
                .with_errors(vec![ValidationError {
                    detail: message.clone(),
                    pointer: format!("/{field}"),
                }])
        }
        DomainError::Database { .. } => {
            // Details stay in the log.
            tracing::error!(error = ?e, "database error");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal error occurred",
            )
            .with_code("STORAGE_FAILURE")
        }
    };
    problem.with_instance(instance).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::ResourceKind;

    #[test]
    fn codes_follow_the_resource_kind() {
        let p = map_domain_error(&DomainError::not_found(ResourceKind::Role, "r1"), "/v1/roles/r1");
        assert_eq!(p.0.status, 404);
        assert_eq!(p.0.code, "ROLE_NOT_FOUND");
        assert_eq!(p.0.instance, "/v1/roles/r1");

        let p = map_domain_error(
            &DomainError::already_exists(ResourceKind::Permission, "p1"),
            "/v1/permissions",
        );
        assert_eq!(p.0.status, 409);
        assert_eq!(p.0.code, "PERMISSION_ALREADY_EXISTS");
    }

    #[test]
    fn validation_points_at_the_field() {
        let p = map_domain_error(&DomainError::validation("email", "must contain '@'"), "/v1/users");
        assert_eq!(p.0.status, 400);
        assert_eq!(p.0.code, "VALIDATION");
        assert_eq!(p.0.errors.unwrap()[0].pointer, "/email");
    }

    #[test]
    fn database_details_are_hidden() {
        let p = map_domain_error(&DomainError::database("secret dsn"), "/v1/users");
        assert_eq!(p.0.status, 500);
        assert!(!p.0.detail.contains("secret"));
    }
}
