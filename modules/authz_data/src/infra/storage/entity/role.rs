use keyset_db::FieldMap;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::contract::Role;
use crate::infra::storage::repo::StoredResource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StoredResource for Role {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::RoleId
    }

    fn fields() -> FieldMap<Entity> {
        FieldMap::new()
            .insert("roleId", Column::RoleId)
            .insert_nullable("name", Column::Name)
            .insert("createdAt", Column::CreatedAt)
    }

    fn from_model(m: Model) -> Self {
        Self {
            role_id: m.role_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
        }
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            role_id: Set(self.role_id.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            created_at: Set(self.created_at),
        }
    }
}
