use std::sync::Arc;

use apikit::{ApiError, ApiResult, Listing, ProblemResponse};
use axum::{
    extract::{rejection::JsonRejection, Path},
    http::{StatusCode, Uri},
    Extension, Json,
};
use tracing::{debug, info};

use crate::api::rest::dto::{ListResponse, RestResource};
use crate::api::rest::error::map_domain_error;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type HandlerResult<T> = ApiResult<T, ProblemResponse>;

fn domain_error(e: DomainError, uri: &Uri) -> ApiError<ProblemResponse> {
    ApiError::from_domain(map_domain_error(&e, uri.path()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, uri: &Uri) -> HandlerResult<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|r| domain_error(DomainError::validation("body", r.body_text()), uri))
}

pub async fn list<R: RestResource>(
    Extension(svc): Extension<Arc<Service<R>>>,
    uri: Uri,
    Listing(params): Listing,
) -> HandlerResult<Json<ListResponse<R::Dto>>> {
    debug!(kind = %R::KIND, ?params, "list request");

    let query = svc
        .parse_query(&params)
        .map_err(|e| ApiError::keyset(e, uri.path()))?;
    let page = svc
        .list(&query)
        .await
        .map_err(|e| ApiError::keyset(e, uri.path()))?;
    Ok(Json(ListResponse::from_page(page, &query)))
}

pub async fn get<R: RestResource>(
    Extension(svc): Extension<Arc<Service<R>>>,
    Path(id): Path<String>,
    uri: Uri,
) -> HandlerResult<Json<R::Dto>> {
    let row = svc.get(&id).await.map_err(|e| domain_error(e, &uri))?;
    Ok(Json(row.into()))
}

pub async fn create<R: RestResource>(
    Extension(svc): Extension<Arc<Service<R>>>,
    uri: Uri,
    payload: Result<Json<R::CreateReq>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<R::Dto>)> {
    let req = body(payload, &uri)?;
    let row = svc
        .create(req.into())
        .await
        .map_err(|e| domain_error(e, &uri))?;
    info!(kind = %R::KIND, id = row.id(), "created via REST");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update<R: RestResource>(
    Extension(svc): Extension<Arc<Service<R>>>,
    Path(id): Path<String>,
    uri: Uri,
    payload: Result<Json<R::UpdateReq>, JsonRejection>,
) -> HandlerResult<Json<R::Dto>> {
    let req = body(payload, &uri)?;
    let row = svc
        .update(&id, req.into())
        .await
        .map_err(|e| domain_error(e, &uri))?;
    Ok(Json(row.into()))
}

pub async fn delete<R: RestResource>(
    Extension(svc): Extension<Arc<Service<R>>>,
    Path(id): Path<String>,
    uri: Uri,
) -> HandlerResult<StatusCode> {
    svc.delete(&id).await.map_err(|e| domain_error(e, &uri))?;
    Ok(StatusCode::NO_CONTENT)
}
