use keyset_db::FieldMap;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::contract::Tenant;
use crate::infra::storage::repo::StoredResource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,
    pub name: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StoredResource for Tenant {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::TenantId
    }

    fn fields() -> FieldMap<Entity> {
        FieldMap::new()
            .insert("tenantId", Column::TenantId)
            .insert_nullable("name", Column::Name)
            .insert("createdAt", Column::CreatedAt)
    }

    fn from_model(m: Model) -> Self {
        Self {
            tenant_id: m.tenant_id,
            name: m.name,
            created_at: m.created_at,
        }
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            tenant_id: Set(self.tenant_id.clone()),
            name: Set(self.name.clone()),
            created_at: Set(self.created_at),
        }
    }
}
