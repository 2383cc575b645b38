//! SeaORM-backed repository for every resource.
//!
//! Generic over `C: ConnectionTrait`, so it runs on a pooled
//! `DatabaseConnection` or inside a caller's `DatabaseTransaction`.

use std::marker::PhantomData;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use keyset_core::{ListQuery, Page};
use keyset_db::FieldMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, SqlErr,
};

use crate::domain::repo::{DuplicateKey, Repository};
use crate::domain::resource::Resource;

/// Table mapping of a domain record.
pub trait StoredResource: Resource {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send + Sync;

    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// API sort/search field names → columns.
    fn fields() -> FieldMap<Self::Entity>;

    fn from_model(m: <Self::Entity as EntityTrait>::Model) -> Self;

    fn to_active_model(&self) -> Self::ActiveModel;
}

pub struct SeaOrmRepository<R, C> {
    conn: C,
    _resource: PhantomData<fn() -> R>,
}

impl<R, C> SeaOrmRepository<R, C>
where
    R: StoredResource,
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            _resource: PhantomData,
        }
    }
}

fn insert_error(e: DbErr) -> anyhow::Error {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => anyhow::Error::new(DuplicateKey),
        _ => anyhow::Error::new(e).context("insert failed"),
    }
}

#[async_trait]
impl<R, C> Repository<R> for SeaOrmRepository<R, C>
where
    R: StoredResource,
    <R::Entity as EntityTrait>::Model: IntoActiveModel<R::ActiveModel>,
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<R>> {
        let found = R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(&self.conn)
            .await
            .with_context(|| format!("find {} failed", R::KIND))?;
        Ok(found.map(R::from_model))
    }

    async fn insert(&self, row: R) -> anyhow::Result<()> {
        R::Entity::insert(row.to_active_model())
            .exec_without_returning(&self.conn)
            .await
            .map_err(insert_error)?;
        Ok(())
    }

    async fn update(&self, row: R) -> anyhow::Result<bool> {
        let res = R::Entity::update_many()
            .set(row.to_active_model())
            .filter(R::id_column().eq(row.id()))
            .exec(&self.conn)
            .await
            .context("update failed")?;
        if res.rows_affected > 0 {
            return Ok(true);
        }
        // MySQL reports changed rows, not matched ones.
        Ok(self.find_by_id(row.id()).await?.is_some())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let res = R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list_page(
        &self,
        query: &ListQuery,
        deadline: Option<Duration>,
    ) -> keyset_core::Result<Page<R>> {
        let fields = R::fields();
        let page = keyset_db::paginate_select(
            &self.conn,
            R::Entity::find(),
            &fields,
            R::catalog(),
            query,
            deadline,
        )
        .await?;
        Ok(page.map_items(R::from_model))
    }
}
