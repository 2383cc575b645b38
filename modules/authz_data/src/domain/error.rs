use std::fmt;

use thiserror::Error;

use crate::domain::resource::ResourceKind;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: ResourceKind, id: String },

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn already_exists(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Alternate formatting keeps the whole `anyhow` context chain.
    pub fn database(e: impl fmt::Display) -> Self {
        Self::Database {
            message: format!("{e:#}"),
        }
    }
}
