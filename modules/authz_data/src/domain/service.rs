use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use keyset_core::{LimitCfg, ListParams, ListQuery, Page};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::{DuplicateKey, Repository};
use crate::domain::resource::{validate_id, Resource};

/// Service configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceConfig {
    pub limits: LimitCfg,
    /// Upper bound on one range scan; `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
}

/// Domain service for one resource type.
/// Depends only on the repository port, not on infra types.
pub struct Service<R: Resource> {
    repo: Arc<dyn Repository<R>>,
    config: ServiceConfig,
}

impl<R: Resource> Clone for Service<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            config: self.config,
        }
    }
}

impl<R: Resource> Service<R> {
    pub fn new(repo: Arc<dyn Repository<R>>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Validate raw list parameters against this resource's catalog.
    pub fn parse_query(&self, params: &ListParams) -> keyset_core::Result<ListQuery> {
        ListQuery::parse(params, R::catalog(), self.config.limits)
    }

    #[instrument(
        name = "authz_data.service.list",
        skip(self, query),
        fields(kind = %R::KIND, sort_by = query.sort.name(), limit = query.limit)
    )]
    pub async fn list(&self, query: &ListQuery) -> keyset_core::Result<Page<R>> {
        let page = self.repo.list_page(query, self.config.query_timeout).await?;
        debug!(
            count = page.items.len(),
            has_more = page.page_info.has_more,
            "listed page"
        );
        Ok(page)
    }

    #[instrument(name = "authz_data.service.get", skip(self), fields(kind = %R::KIND))]
    pub async fn get(&self, id: &str) -> Result<R, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::database)?
            .ok_or_else(|| DomainError::not_found(R::KIND, id))
    }

    #[instrument(name = "authz_data.service.create", skip(self), fields(kind = %R::KIND))]
    pub async fn create(&self, new: R::New) -> Result<R, DomainError> {
        let id = match R::requested_id(&new) {
            Some(id) => id.trim().to_owned(),
            None => Uuid::new_v4().to_string(),
        };
        validate_id(&id)?;

        // Microseconds: the finest precision every backend keeps.
        let row = R::create(id, new, Utc::now().trunc_subsecs(6));
        row.validate()?;

        if self
            .repo
            .find_by_id(row.id())
            .await
            .map_err(DomainError::database)?
            .is_some()
        {
            return Err(DomainError::already_exists(R::KIND, row.id()));
        }

        match self.repo.insert(row.clone()).await {
            Ok(()) => {
                info!(id = row.id(), "created");
                Ok(row)
            }
            Err(e) if e.is::<DuplicateKey>() => Err(DomainError::already_exists(R::KIND, row.id())),
            Err(e) => Err(DomainError::database(e)),
        }
    }

    #[instrument(name = "authz_data.service.update", skip(self), fields(kind = %R::KIND))]
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R, DomainError> {
        let mut row = self.get(id).await?;
        row.apply(patch);
        row.validate()?;

        let updated = self
            .repo
            .update(row.clone())
            .await
            .map_err(DomainError::database)?;
        if !updated {
            return Err(DomainError::not_found(R::KIND, id));
        }
        info!("updated");
        Ok(row)
    }

    #[instrument(name = "authz_data.service.delete", skip(self), fields(kind = %R::KIND))]
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(DomainError::database)?;
        if !deleted {
            return Err(DomainError::not_found(R::KIND, id));
        }
        info!("deleted");
        Ok(())
    }
}
