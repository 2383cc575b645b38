use thiserror::Error;

/// Unified error for list-query validation, cursor decoding and range-scan execution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Unsupported `sortBy`, malformed `sortOrder`, out-of-range `limit`, conflicting anchors.
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParameter { param: &'static str, reason: String },

    /// Raw text that cannot be coerced into the declared type of a sort field.
    #[error("invalid value for sort field `{field}`: {reason}")]
    InvalidSortValue { field: String, reason: String },

    /// Anchor identifier missing or an anchor value that does not parse.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// Any failure of the delegated range scan, including deadline expiry.
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_parameter(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }

    pub fn invalid_cursor(reason: impl Into<String>) -> Self {
        Self::InvalidCursor(reason.into())
    }

    pub fn storage(reason: impl ToString) -> Self {
        Self::Storage(reason.to_string())
    }

    /// Stable machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "INVALID_PARAMETER",
            Error::InvalidSortValue { .. } => "INVALID_SORT_VALUE",
            Error::InvalidCursor(_) => "INVALID_CURSOR",
            Error::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Client errors are never worth retrying; storage failures may be retried by the caller.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Storage(_))
    }
}
