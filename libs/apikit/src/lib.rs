//! HTTP surface helpers shared by REST modules: RFC 9457 problems, the
//! unified handler error type and the list-parameter extractor.

pub mod error;
pub mod listing;
pub mod problem;

pub use error::{ApiError, ApiResult};
pub use listing::{keyset_error_to_problem, Listing};
pub use problem::{
    bad_request, conflict, internal_error, not_found, Problem, ProblemResponse, ValidationError,
    APPLICATION_PROBLEM_JSON,
};
