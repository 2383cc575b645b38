use keyset_db::FieldMap;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::contract::Permission;
use crate::infra::storage::repo::StoredResource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StoredResource for Permission {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::PermissionId
    }

    fn fields() -> FieldMap<Entity> {
        FieldMap::new()
            .insert("permissionId", Column::PermissionId)
            .insert_nullable("name", Column::Name)
            .insert("createdAt", Column::CreatedAt)
    }

    fn from_model(m: Model) -> Self {
        Self {
            permission_id: m.permission_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
        }
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            permission_id: Set(self.permission_id.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
        }
    }
}
