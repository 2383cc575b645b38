//! Authorization data: users, tenants, roles and permissions with CRUD and
//! keyset-paginated listing over SeaORM.
//!
//! Layout follows the usual module shape:
//! - `contract`: transport-agnostic models
//! - `domain`: resource trait, sort catalogs, repository port, service
//! - `infra::storage`: SeaORM entities, repository, migrations
//! - `api::rest`: DTOs, handlers, routes, problem mapping

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::AuthzDataConfig;
pub use domain::error::DomainError;
pub use domain::resource::{Resource, ResourceKind};
pub use domain::service::{Service, ServiceConfig};
pub use module::{AuthzDataModule, MODULE_NAME};
