//! Tables for users, tenants, roles and permissions.
//!
//! Every non-identifier sort field gets a composite `(field, id)` index that
//! matches the keyset ordering, so range scans stay index-backed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    TenantId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    RoleId,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    PermissionId,
    Name,
    Description,
    CreatedAt,
}

fn id_col(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .string_len(128)
        .not_null()
        .primary_key()
        .to_owned()
}

fn text_col(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).string_len(255).null().to_owned()
}

fn created_col(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn keyset_index(
    name: &str,
    table: impl IntoIden + 'static,
    field: impl IntoIden + 'static,
    id: impl IntoIden + 'static,
) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(field)
        .col(id)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut id_col(Users::UserId))
                    .col(&mut text_col(Users::Email))
                    .col(&mut created_col(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(&mut id_col(Tenants::TenantId))
                    .col(&mut text_col(Tenants::Name))
                    .col(&mut created_col(Tenants::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(&mut id_col(Roles::RoleId))
                    .col(&mut text_col(Roles::Name))
                    .col(&mut text_col(Roles::Description))
                    .col(&mut created_col(Roles::CreatedAt))
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(&mut id_col(Permissions::PermissionId))
                    .col(&mut text_col(Permissions::Name))
                    .col(&mut text_col(Permissions::Description))
                    .col(&mut created_col(Permissions::CreatedAt))
                    .to_owned(),
            )
            .await?;

        for index in [
            keyset_index("idx_users_email_id", Users::Table, Users::Email, Users::UserId),
            keyset_index(
                "idx_users_created_at_id",
                Users::Table,
                Users::CreatedAt,
                Users::UserId,
            ),
            keyset_index("idx_tenants_name_id", Tenants::Table, Tenants::Name, Tenants::TenantId),
            keyset_index(
                "idx_tenants_created_at_id",
                Tenants::Table,
                Tenants::CreatedAt,
                Tenants::TenantId,
            ),
            keyset_index("idx_roles_name_id", Roles::Table, Roles::Name, Roles::RoleId),
            keyset_index(
                "idx_roles_created_at_id",
                Roles::Table,
                Roles::CreatedAt,
                Roles::RoleId,
            ),
            keyset_index(
                "idx_permissions_name_id",
                Permissions::Table,
                Permissions::Name,
                Permissions::PermissionId,
            ),
            keyset_index(
                "idx_permissions_created_at_id",
                Permissions::Table,
                Permissions::CreatedAt,
                Permissions::PermissionId,
            ),
        ] {
            manager.create_index(index).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
