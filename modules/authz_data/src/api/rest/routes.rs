use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreatePermissionReq, CreateRoleReq, CreateTenantReq, CreateUserReq, CursorDto, ListResponse,
    PermissionDto, RestResource, RoleDto, TenantDto, UpdatePermissionReq, UpdateRoleReq,
    UpdateTenantReq, UpdateUserReq, UserDto,
};
use crate::api::rest::handlers;
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Warden authorization data API"),
    components(schemas(
        apikit::Problem,
        apikit::ValidationError,
        keyset_core::SortDir,
        keyset_core::PageInfo,
        CursorDto,
        UserDto,
        CreateUserReq,
        UpdateUserReq,
        TenantDto,
        CreateTenantReq,
        UpdateTenantReq,
        RoleDto,
        CreateRoleReq,
        UpdateRoleReq,
        PermissionDto,
        CreatePermissionReq,
        UpdatePermissionReq,
        ListResponse<UserDto>,
        ListResponse<TenantDto>,
        ListResponse<RoleDto>,
        ListResponse<PermissionDto>,
    ))
)]
pub struct ApiDoc;

/// `/v1/{collection}` and `/v1/{collection}/{id}` for one resource.
fn resource_routes<R: RestResource>(svc: Arc<Service<R>>) -> Router {
    let collection = format!("/v1/{}", R::COLLECTION);
    let item = format!("{collection}/{{id}}");
    Router::new()
        .route(
            &collection,
            get(handlers::list::<R>).post(handlers::create::<R>),
        )
        .route(
            &item,
            get(handlers::get::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .layer(Extension(svc))
}

/// Services of the four resources.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<Service<crate::contract::User>>,
    pub tenants: Arc<Service<crate::contract::Tenant>>,
    pub roles: Arc<Service<crate::contract::Role>>,
    pub permissions: Arc<Service<crate::contract::Permission>>,
}

pub fn router(services: Services) -> Router {
    Router::new()
        .merge(resource_routes(services.users))
        .merge(resource_routes(services.tenants))
        .merge(resource_routes(services.roles))
        .merge(resource_routes(services.permissions))
        .route(
            "/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}
