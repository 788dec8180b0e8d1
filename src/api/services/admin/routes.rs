//! Admin API 路由配置

use actix_web::web;

use super::auth::{authenticate, verify};

/// 认证路由 `/admin`
///
/// - POST /admin/authenticate - 登录
/// - POST /admin/verify - 验证 token
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .route("/authenticate", web::post().to(authenticate))
        .route("/verify", web::post().to(verify))
}
