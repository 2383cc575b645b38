use std::time::Duration;

use async_trait::async_trait;
use keyset_core::{ListQuery, Page};

use crate::domain::resource::Resource;

/// Marker carried inside `anyhow::Error` when an insert hits an existing key.
#[derive(Debug, thiserror::Error)]
#[error("duplicate key")]
pub struct DuplicateKey;

/// Persistence port for one resource type.
///
/// CRUD reports infrastructure failures as `anyhow::Error`; listing speaks
/// the pagination engine's error type so that parameter and cursor problems
/// reach the client unchanged.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<R>>;
    /// Fails with [`DuplicateKey`] when the id is taken.
    async fn insert(&self, row: R) -> anyhow::Result<()>;
    /// Returns false when no row has the id.
    async fn update(&self, row: R) -> anyhow::Result<bool>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
    async fn list_page(
        &self,
        query: &ListQuery,
        deadline: Option<Duration>,
    ) -> keyset_core::Result<Page<R>>;
}
