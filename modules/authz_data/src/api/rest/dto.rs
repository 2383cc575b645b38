use chrono::{DateTime, Utc};
use keyset_core::{Direction, ListQuery, Page};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::{
    NewPermission, NewRole, NewTenant, NewUser, Permission, PermissionPatch, Role, RolePatch,
    Tenant, TenantPatch, User, UserPatch,
};
use crate::domain::resource::Resource;

/// Wire types of a resource.
pub trait RestResource: Resource {
    type Dto: Serialize + From<Self> + Send;
    type CreateReq: DeserializeOwned + Into<Self::New> + Send;
    type UpdateReq: DeserializeOwned + Into<Self::Patch> + Send;

    /// Collection path segment, e.g. `users`.
    const COLLECTION: &'static str;
}

/// Anchor of a neighbouring page, sent back as `after`/`afterValue` or
/// `before`/`beforeValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CursorDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<CursorDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<CursorDto>,
    pub has_more: bool,
}

fn cursor_of<R: Resource>(row: &R, query: &ListQuery) -> CursorDto {
    CursorDto {
        id: row.id().to_owned(),
        value: if query.sort.is_identifier() {
            None
        } else {
            row.keyset_value(query.sort.name()).to_raw()
        },
    }
}

impl<T> ListResponse<T> {
    /// Build the envelope; cursors come from the first and last rows.
    ///
    /// `has_more` always refers to the scan direction: past the last row for
    /// `after`, before the first row for `before`.
    pub fn from_page<R>(page: Page<R>, query: &ListQuery) -> Self
    where
        R: Resource + Into<T>,
    {
        let has_more = page.page_info.has_more;
        let arrived = query.cursor.is_some();
        let (has_prev, has_next) = match query.direction {
            Direction::After => (arrived, has_more),
            Direction::Before => (has_more, arrived),
        };
        let prev_cursor = page
            .first()
            .filter(|_| has_prev)
            .map(|r| cursor_of(r, query));
        let next_cursor = page
            .last()
            .filter(|_| has_next)
            .map(|r| cursor_of(r, query));

        Self {
            results: page.items.into_iter().map(Into::into).collect(),
            prev_cursor,
            next_cursor,
            has_more,
        }
    }
}

/* ---------- users ---------- */

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserReq {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserReq {
    #[serde(default)]
    pub email: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(r: CreateUserReq) -> Self {
        Self {
            user_id: r.user_id,
            email: r.email,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(r: UpdateUserReq) -> Self {
        Self { email: r.email }
    }
}

impl RestResource for User {
    type Dto = UserDto;
    type CreateReq = CreateUserReq;
    type UpdateReq = UpdateUserReq;
    const COLLECTION: &'static str = "users";
}

/* ---------- tenants ---------- */

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantDto {
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTenantReq {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTenantReq {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<Tenant> for TenantDto {
    fn from(t: Tenant) -> Self {
        Self {
            tenant_id: t.tenant_id,
            name: t.name,
            created_at: t.created_at,
        }
    }
}

impl From<CreateTenantReq> for NewTenant {
    fn from(r: CreateTenantReq) -> Self {
        Self {
            tenant_id: r.tenant_id,
            name: r.name,
        }
    }
}

impl From<UpdateTenantReq> for TenantPatch {
    fn from(r: UpdateTenantReq) -> Self {
        Self { name: r.name }
    }
}

impl RestResource for Tenant {
    type Dto = TenantDto;
    type CreateReq = CreateTenantReq;
    type UpdateReq = UpdateTenantReq;
    const COLLECTION: &'static str = "tenants";
}

/* ---------- roles ---------- */

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateRoleReq {
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRoleReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            role_id: r.role_id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

impl From<CreateRoleReq> for NewRole {
    fn from(r: CreateRoleReq) -> Self {
        Self {
            role_id: r.role_id,
            name: r.name,
            description: r.description,
        }
    }
}

impl From<UpdateRoleReq> for RolePatch {
    fn from(r: UpdateRoleReq) -> Self {
        Self {
            name: r.name,
            description: r.description,
        }
    }
}

impl RestResource for Role {
    type Dto = RoleDto;
    type CreateReq = CreateRoleReq;
    type UpdateReq = UpdateRoleReq;
    const COLLECTION: &'static str = "roles";
}

/* ---------- permissions ---------- */

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDto {
    pub permission_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePermissionReq {
    #[serde(default)]
    pub permission_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePermissionReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<Permission> for PermissionDto {
    fn from(p: Permission) -> Self {
        Self {
            permission_id: p.permission_id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
        }
    }
}

impl From<CreatePermissionReq> for NewPermission {
    fn from(r: CreatePermissionReq) -> Self {
        Self {
            permission_id: r.permission_id,
            name: r.name,
            description: r.description,
        }
    }
}

impl From<UpdatePermissionReq> for PermissionPatch {
    fn from(r: UpdatePermissionReq) -> Self {
        Self {
            name: r.name,
            description: r.description,
        }
    }
}

impl RestResource for Permission {
    type Dto = PermissionDto;
    type CreateReq = CreatePermissionReq;
    type UpdateReq = UpdatePermissionReq;
    const COLLECTION: &'static str = "permissions";
}
