//! CMS 内容端点
//!
//! 读取公开；写操作由 `AdminAuth` 中间件保护（见 `cms_routes`）。

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::AdminAuth;
use crate::errors::PortfolioError;
use crate::storage::{CmsConfig, CmsSnapshot, ContentBlockInput, ContentStore, TemplateInput};

use super::helpers::{created_response, success_response};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

/// GET /api/cms/content[?type=T]
pub async fn list_content(
    store: web::Data<ContentStore>,
    query: web::Query<ContentQuery>,
) -> HttpResponse {
    let kind = query.kind.as_deref().filter(|k| !k.is_empty());
    success_response(&store.list(kind))
}

/// GET /api/cms/content/{id}
pub async fn get_content(
    store: web::Data<ContentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    let block = store
        .get(&id)
        .ok_or_else(|| PortfolioError::not_found(format!("Content block '{}' not found", id)))?;
    Ok(success_response(&block))
}

/// PUT /api/cms/content/{id}
pub async fn put_content(
    store: web::Data<ContentStore>,
    id: web::Path<String>,
    body: web::Json<ContentBlockInput>,
) -> Result<HttpResponse, PortfolioError> {
    let block = store.put(&id, body.into_inner()).await?;
    Ok(success_response(&block))
}

/// DELETE /api/cms/content/{id}
pub async fn delete_content(
    store: web::Data<ContentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    let removed = store.delete(&id).await?;
    Ok(success_response(&DeletedResponse { deleted: removed.id }))
}

/// GET /api/cms/config
pub async fn get_cms_config(store: web::Data<ContentStore>) -> HttpResponse {
    success_response(&store.config())
}

/// PUT /api/cms/config
pub async fn put_cms_config(
    store: web::Data<ContentStore>,
    body: web::Json<CmsConfig>,
) -> Result<HttpResponse, PortfolioError> {
    let config = store.update_config(body.into_inner()).await?;
    Ok(success_response(&config))
}

/// GET /api/cms/templates
pub async fn list_templates(store: web::Data<ContentStore>) -> HttpResponse {
    success_response(&store.templates())
}

/// POST /api/cms/templates
pub async fn save_template(
    store: web::Data<ContentStore>,
    body: web::Json<TemplateInput>,
) -> Result<HttpResponse, PortfolioError> {
    let template = store.save_template(body.into_inner()).await?;
    Ok(created_response(&template))
}

/// DELETE /api/cms/templates/{id}
pub async fn delete_template(
    store: web::Data<ContentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    let removed = store.delete_template(&id).await?;
    Ok(success_response(&DeletedResponse { deleted: removed.id }))
}

/// GET /api/cms/export
pub async fn export_cms(store: web::Data<ContentStore>) -> HttpResponse {
    success_response(&store.export())
}

/// POST /api/cms/import
pub async fn import_cms(
    store: web::Data<ContentStore>,
    body: web::Json<CmsSnapshot>,
) -> Result<HttpResponse, PortfolioError> {
    let imported = store.import(body.into_inner()).await?;
    info!("CMS import via API: {} blocks", imported);
    Ok(success_response(&ImportResponse { imported }))
}

/// CMS 路由 `/cms`
///
/// `/export` is a GET but still exposes the whole store, so it sits in a
/// nested scope that is always authenticated.
pub fn cms_routes() -> actix_web::Scope {
    web::scope("/cms")
        .service(
            web::scope("/export")
                .wrap(AdminAuth::all_methods())
                .route("", web::get().to(export_cms)),
        )
        .service(
            web::scope("")
                .wrap(AdminAuth::writes_only())
                .route("/import", web::post().to(import_cms))
                .route("/content", web::get().to(list_content))
                .route("/content/{id}", web::get().to(get_content))
                .route("/content/{id}", web::put().to(put_content))
                .route("/content/{id}", web::delete().to(delete_content))
                .route("/config", web::get().to(get_cms_config))
                .route("/config", web::put().to(put_cms_config))
                .route("/templates", web::get().to(list_templates))
                .route("/templates", web::post().to(save_template))
                .route("/templates/{id}", web::delete().to(delete_template)),
        )
}
