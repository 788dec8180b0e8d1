use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{error, info, trace};

use crate::api::constants::SESSION_COOKIE_NAME;
use crate::errors::PortfolioError;
use crate::services::{AuthService, SessionUser, extract_bearer};

/// Admin authentication middleware
///
/// With [`AdminAuth::writes_only`], safe methods (GET/HEAD/OPTIONS) pass
/// through untouched; [`AdminAuth::all_methods`] guards every request except
/// CORS preflight. The admin session token is taken from
/// `Authorization: Bearer` or, failing that, from the session cookie. The
/// verified [`SessionUser`] is stored in the request extensions.
#[derive(Clone, Copy, Debug)]
pub struct AdminAuth {
    guard_reads: bool,
}

impl AdminAuth {
    pub fn writes_only() -> Self {
        Self { guard_reads: false }
    }

    pub fn all_methods() -> Self {
        Self { guard_reads: true }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            guard_reads: self.guard_reads,
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    guard_reads: bool,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn bypasses_auth(method: &Method, guard_reads: bool) -> bool {
        if *method == Method::OPTIONS {
            return true;
        }
        !guard_reads && matches!(*method, Method::GET | Method::HEAD)
    }

    /// Bearer header first, session cookie second
    fn extract_token(req: &ServiceRequest) -> Option<String> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        if let Some(token) = extract_bearer(header) {
            return Some(token.to_string());
        }

        req.cookie(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn authorize(req: &ServiceRequest) -> Result<SessionUser, PortfolioError> {
        let auth = req.app_data::<web::Data<AuthService>>().ok_or_else(|| {
            error!("AuthService missing from app data");
            PortfolioError::internal("Authentication unavailable")
        })?;

        let token = Self::extract_token(req)
            .ok_or_else(|| PortfolioError::unauthorized("Missing session token"))?;
        let claims = auth.jwt().verify_admin(&token)?;
        Ok(claims.into())
    }

    fn reject(req: ServiceRequest, err: PortfolioError) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Admin authentication failed for {} {}: {}",
            req.method(),
            req.path(),
            err
        );
        let response = err.error_response().map_into_right_body();
        req.into_response(response)
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let guard_reads = self.guard_reads;

        Box::pin(async move {
            if Self::bypasses_auth(req.method(), guard_reads) {
                trace!("Read-only request - bypassing admin authentication");
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            match Self::authorize(&req) {
                Ok(user) => {
                    trace!("Admin authentication successful ({})", user.sub);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(e) => Ok(Self::reject(req, e)),
            }
        })
    }
}
