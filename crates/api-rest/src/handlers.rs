//! Box API v2.0 endpoint handlers.
//!
//! Handlers run the whole mapping synchronously against a per-request session and return the
//! JSON produced by [`box_core::to_json`] verbatim.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json, Response},
};
use box_core::{
    apply_update, build_children, build_item, folder_from_json, to_json, BoxContext, BoxError,
    BoxResult, DocRef, Document,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Paging parameters of the folder items endpoint. Absent values fall back to the configured
/// defaults; values are validated by the core so malformed numbers become `400`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub fields: Option<String>,
}

fn box_json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn load(ctx: &BoxContext<'_>, id: &str, folderish: bool) -> BoxResult<Document> {
    let doc = ctx.session.get_document(&DocRef::new(id))?;
    if doc.folderish != folderish {
        let kind = if folderish { "folder" } else { "file" };
        return Err(BoxError::Lookup(format!("{id} is not a {kind}")));
    }
    Ok(doc)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint. Not behind the API key.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Box API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/2.0/folders/{id}",
    params(
        ("id" = String, Path, description = "Folder id"),
        ("As-User" = Option<String>, Header, description = "Login to act as")
    ),
    responses(
        (status = 200, description = "Box folder", content_type = "application/json"),
        (status = 404, description = "Unknown folder or principal"),
        (status = 500, description = "Mapping failed")
    )
)]
/// Returns the folder with its first page of children.
pub async fn get_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.with_context(&headers, |ctx| {
        let folder = load(ctx, &id, true)?;
        to_json(&build_item(ctx, &folder)?)
    })?;
    Ok(box_json(body))
}

#[utoipa::path(
    put,
    path = "/2.0/folders/{id}",
    params(
        ("id" = String, Path, description = "Folder id"),
        ("As-User" = Option<String>, Header, description = "Login to act as")
    ),
    request_body(content = String, description = "Complete Box folder JSON", content_type = "application/json"),
    responses(
        (status = 200, description = "Updated Box folder", content_type = "application/json"),
        (status = 400, description = "Body is not a Box folder"),
        (status = 404, description = "Unknown folder or principal"),
        (status = 409, description = "Move rejected"),
        (status = 500, description = "Update failed")
    )
)]
/// Replaces the folder with the body. Every field is authoritative: omitted fields are cleared.
pub async fn put_folder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: String,
) -> Result<Response, ApiError> {
    let incoming = folder_from_json(&body)?;
    let body = state.with_context(&headers, |ctx| {
        let mut folder = load(ctx, &id, true)?;
        apply_update(ctx, &mut folder, &incoming)?;
        let updated = ctx.session.get_document(&folder.id)?;
        to_json(&build_item(ctx, &updated)?)
    })?;
    Ok(box_json(body))
}

#[utoipa::path(
    get,
    path = "/2.0/folders/{id}/items",
    params(
        ("id" = String, Path, description = "Folder id"),
        ("As-User" = Option<String>, Header, description = "Login to act as"),
        ItemsQuery
    ),
    responses(
        (status = 200, description = "One page of the folder's children", content_type = "application/json"),
        (status = 400, description = "Non-numeric limit or offset"),
        (status = 404, description = "Unknown folder")
    )
)]
/// Lists one page of a folder's direct children.
pub async fn get_folder_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ItemsQuery>,
) -> Result<Response, ApiError> {
    let body = state.with_context(&headers, |ctx| {
        let folder = load(ctx, &id, true)?;
        let limit = query.limit.as_deref().unwrap_or(ctx.config.default_limit());
        let offset = query.offset.as_deref().unwrap_or(ctx.config.default_offset());
        let fields = query.fields.as_deref().unwrap_or(ctx.config.default_fields());
        to_json(&build_children(ctx, &folder, limit, offset, fields)?)
    })?;
    Ok(box_json(body))
}

#[utoipa::path(
    get,
    path = "/2.0/files/{id}",
    params(
        ("id" = String, Path, description = "File id"),
        ("As-User" = Option<String>, Header, description = "Login to act as")
    ),
    responses(
        (status = 200, description = "Box file", content_type = "application/json"),
        (status = 404, description = "Unknown file or principal")
    )
)]
pub async fn get_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.with_context(&headers, |ctx| {
        let file = load(ctx, &id, false)?;
        to_json(&build_item(ctx, &file)?)
    })?;
    Ok(box_json(body))
}
