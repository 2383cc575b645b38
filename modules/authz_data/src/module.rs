use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes::{self, Services};
use crate::config::AuthzDataConfig;
use crate::contract::{Permission, Role, Tenant, User};
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::storage::{Migrator, SeaOrmRepository};

pub const MODULE_NAME: &str = "authz_data";

/// Wires repositories, services and REST routes for the four resources.
#[derive(Clone)]
pub struct AuthzDataModule {
    services: Services,
}

fn service<R, C>(conn: C, cfg: ServiceConfig) -> Arc<Service<R>>
where
    R: crate::infra::storage::StoredResource,
    <R::Entity as sea_orm::EntityTrait>::Model: sea_orm::IntoActiveModel<R::ActiveModel>,
    C: ConnectionTrait + Send + Sync + 'static,
{
    Arc::new(Service::new(Arc::new(SeaOrmRepository::<R, C>::new(conn)), cfg))
}

impl AuthzDataModule {
    pub fn new<C>(conn: C, cfg: &AuthzDataConfig) -> anyhow::Result<Self>
    where
        C: ConnectionTrait + Clone + Send + Sync + 'static,
    {
        cfg.validate().context("invalid authz_data configuration")?;
        let svc_cfg = cfg.service_config();
        info!(
            default_page_size = cfg.default_page_size,
            max_page_size = cfg.max_page_size,
            query_timeout = ?cfg.query_timeout,
            "authz_data module initialized"
        );
        Ok(Self {
            services: Services {
                users: service::<User, C>(conn.clone(), svc_cfg),
                tenants: service::<Tenant, C>(conn.clone(), svc_cfg),
                roles: service::<Role, C>(conn.clone(), svc_cfg),
                permissions: service::<Permission, C>(conn, svc_cfg),
            },
        })
    }

    /// Apply pending schema migrations.
    pub async fn migrate(conn: &DatabaseConnection) -> anyhow::Result<()> {
        Migrator::up(conn, None)
            .await
            .context("authz_data migrations failed")?;
        info!("authz_data migrations applied");
        Ok(())
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn router(&self) -> Router {
        routes::router(self.services.clone())
    }
}
