pub mod model;

pub use model::{
    NewPermission, NewRole, NewTenant, NewUser, Permission, PermissionPatch, Role, RolePatch,
    Tenant, TenantPatch, User, UserPatch,
};
