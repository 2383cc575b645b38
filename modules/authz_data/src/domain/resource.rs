use std::fmt;

use chrono::{DateTime, Utc};
use keyset_core::{KeysetRow, SortCatalog};

use crate::contract::{
    NewPermission, NewRole, NewTenant, NewUser, Permission, PermissionPatch, Role, RolePatch,
    Tenant, TenantPatch, User, UserPatch,
};
use crate::domain::catalog::{PERMISSION_CATALOG, ROLE_CATALOG, TENANT_CATALOG, USER_CATALOG};
use crate::domain::error::DomainError;

const MAX_ID_LEN: usize = 128;
const MAX_TEXT_LEN: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Tenant,
    Role,
    Permission,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Tenant => "tenant",
            ResourceKind::Role => "role",
            ResourceKind::Permission => "permission",
        }
    }

    /// Prefix of the problem codes, e.g. `USER` in `USER_NOT_FOUND`.
    pub fn code_prefix(self) -> &'static str {
        match self {
            ResourceKind::User => "USER",
            ResourceKind::Tenant => "TENANT",
            ResourceKind::Role => "ROLE",
            ResourceKind::Permission => "PERMISSION",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One kind of authorization record: how it is identified, created,
/// patched, validated and sorted.
pub trait Resource: KeysetRow + Clone + fmt::Debug + Send + Sync + 'static {
    type New: fmt::Debug + Send;
    type Patch: fmt::Debug + Send;

    const KIND: ResourceKind;

    fn catalog() -> &'static SortCatalog;

    fn id(&self) -> &str;

    /// Client-chosen id, if any.
    fn requested_id(new: &Self::New) -> Option<&str>;

    fn create(id: String, new: Self::New, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn validate(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub fn validate_id(id: &str) -> Result<(), DomainError> {
    if id.trim().is_empty() {
        return Err(DomainError::validation("id", "must not be empty"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(DomainError::validation(
            "id",
            format!("must be at most {MAX_ID_LEN} bytes"),
        ));
    }
    if id.contains('/') {
        return Err(DomainError::validation("id", "must not contain '/'"));
    }
    Ok(())
}

fn validate_text(field: &'static str, value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(DomainError::validation(field, "must not be blank")),
        Some(v) if v.len() > MAX_TEXT_LEN => Err(DomainError::validation(
            field,
            format!("must be at most {MAX_TEXT_LEN} bytes"),
        )),
        _ => Ok(()),
    }
}

impl Resource for User {
    type New = NewUser;
    type Patch = UserPatch;

    const KIND: ResourceKind = ResourceKind::User;

    fn catalog() -> &'static SortCatalog {
        &USER_CATALOG
    }

    fn id(&self) -> &str {
        &self.user_id
    }

    fn requested_id(new: &NewUser) -> Option<&str> {
        new.user_id.as_deref()
    }

    fn create(id: String, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            user_id: id,
            email: new.email,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        validate_text("email", self.email.as_deref())?;
        match &self.email {
            Some(email) if !email.contains('@') => {
                Err(DomainError::validation("email", "must contain '@'"))
            }
            _ => Ok(()),
        }
    }
}

impl Resource for Tenant {
    type New = NewTenant;
    type Patch = TenantPatch;

    const KIND: ResourceKind = ResourceKind::Tenant;

    fn catalog() -> &'static SortCatalog {
        &TENANT_CATALOG
    }

    fn id(&self) -> &str {
        &self.tenant_id
    }

    fn requested_id(new: &NewTenant) -> Option<&str> {
        new.tenant_id.as_deref()
    }

    fn create(id: String, new: NewTenant, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id: id,
            name: new.name,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: TenantPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", self.name.as_deref())
    }
}

impl Resource for Role {
    type New = NewRole;
    type Patch = RolePatch;

    const KIND: ResourceKind = ResourceKind::Role;

    fn catalog() -> &'static SortCatalog {
        &ROLE_CATALOG
    }

    fn id(&self) -> &str {
        &self.role_id
    }

    fn requested_id(new: &NewRole) -> Option<&str> {
        new.role_id.as_deref()
    }

    fn create(id: String, new: NewRole, now: DateTime<Utc>) -> Self {
        Self {
            role_id: id,
            name: new.name,
            description: new.description,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", self.name.as_deref())
    }
}

impl Resource for Permission {
    type New = NewPermission;
    type Patch = PermissionPatch;

    const KIND: ResourceKind = ResourceKind::Permission;

    fn catalog() -> &'static SortCatalog {
        &PERMISSION_CATALOG
    }

    fn id(&self) -> &str {
        &self.permission_id
    }

    fn requested_id(new: &NewPermission) -> Option<&str> {
        new.permission_id.as_deref()
    }

    fn create(id: String, new: NewPermission, now: DateTime<Utc>) -> Self {
        Self {
            permission_id: id,
            name: new.name,
            description: new.description,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: PermissionPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", self.name.as_deref())
    }
}
