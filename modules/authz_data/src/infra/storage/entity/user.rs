use keyset_db::FieldMap;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::contract::User;
use crate::infra::storage::repo::StoredResource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub email: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl StoredResource for User {
    type Entity = Entity;
    type ActiveModel = ActiveModel;

    fn id_column() -> Column {
        Column::UserId
    }

    fn fields() -> FieldMap<Entity> {
        FieldMap::new()
            .insert("userId", Column::UserId)
            .insert_nullable("email", Column::Email)
            .insert("createdAt", Column::CreatedAt)
    }

    fn from_model(m: Model) -> Self {
        Self {
            user_id: m.user_id,
            email: m.email,
            created_at: m.created_at,
        }
    }

    fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            user_id: Set(self.user_id.clone()),
            email: Set(self.email.clone()),
            created_at: Set(self.created_at),
        }
    }
}
