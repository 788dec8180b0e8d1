//! Admin 认证相关端点

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use crate::api::services::helpers::success_response;
use crate::errors::PortfolioError;
use crate::services::AuthService;

use super::types::{AuthenticateRequest, AuthenticateResponse, VerifyResponse};

/// POST /api/admin/authenticate - 密码换取会话 token
pub async fn authenticate(
    auth: web::Data<AuthService>,
    body: web::Json<AuthenticateRequest>,
) -> Result<HttpResponse, PortfolioError> {
    let issued = auth.authenticate(&body.password).await?;

    Ok(success_response(&AuthenticateResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

/// POST /api/admin/verify - 校验 Bearer token（签名、过期、角色）
pub async fn verify(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, PortfolioError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = auth.verify_bearer(header)?;
    debug!("Session token verified for {}", user.sub);

    Ok(success_response(&VerifyResponse { valid: true, user }))
}
