//! Sort catalogs and keyset accessors of the four resources.

use keyset_core::{KeysetRow, SortCatalog, SortFieldSpec, TypedValue};
use once_cell::sync::Lazy;

use crate::contract::{Permission, Role, Tenant, User};

pub static USER_CATALOG: Lazy<SortCatalog> = Lazy::new(|| {
    SortCatalog::new(SortFieldSpec::identifier("userId"))
        .with_field(SortFieldSpec::string("email"))
        .with_field(SortFieldSpec::timestamp("createdAt"))
        .with_search_field("userId")
        .with_search_field("email")
});

pub static TENANT_CATALOG: Lazy<SortCatalog> = Lazy::new(|| named_catalog("tenantId"));

pub static ROLE_CATALOG: Lazy<SortCatalog> = Lazy::new(|| named_catalog("roleId"));

pub static PERMISSION_CATALOG: Lazy<SortCatalog> = Lazy::new(|| named_catalog("permissionId"));

fn named_catalog(id: &'static str) -> SortCatalog {
    SortCatalog::new(SortFieldSpec::identifier(id))
        .with_field(SortFieldSpec::string("name"))
        .with_field(SortFieldSpec::timestamp("createdAt"))
        .with_search_field(id)
        .with_search_field("name")
}

impl KeysetRow for User {
    fn keyset_value(&self, field: &str) -> TypedValue {
        match field {
            "userId" => self.user_id.as_str().into(),
            "email" => self.email.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => TypedValue::Null,
        }
    }
}

impl KeysetRow for Tenant {
    fn keyset_value(&self, field: &str) -> TypedValue {
        match field {
            "tenantId" => self.tenant_id.as_str().into(),
            "name" => self.name.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => TypedValue::Null,
        }
    }
}

impl KeysetRow for Role {
    fn keyset_value(&self, field: &str) -> TypedValue {
        match field {
            "roleId" => self.role_id.as_str().into(),
            "name" => self.name.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => TypedValue::Null,
        }
    }
}

impl KeysetRow for Permission {
    fn keyset_value(&self, field: &str) -> TypedValue {
        match field {
            "permissionId" => self.permission_id.as_str().into(),
            "name" => self.name.clone().into(),
            "createdAt" => self.created_at.into(),
            _ => TypedValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyset_core::ValueKind;

    #[test]
    fn catalogs_declare_identifier_first() {
        for (c, id) in [
            (&*USER_CATALOG, "userId"),
            (&*TENANT_CATALOG, "tenantId"),
            (&*ROLE_CATALOG, "roleId"),
            (&*PERMISSION_CATALOG, "permissionId"),
        ] {
            assert_eq!(c.default_sort_by(), id);
            assert!(!c.default_field().nullable);
            assert!(c.resolve(id).unwrap().is_identifier());
            assert_eq!(
                c.resolve("createdAt").unwrap().field().kind,
                ValueKind::Timestamp
            );
            assert_eq!(c.search_fields()[0], id);
        }
        assert!(USER_CATALOG.resolve("email").unwrap().field().nullable);
        assert!(USER_CATALOG.resolve("name").is_none());
    }
}
