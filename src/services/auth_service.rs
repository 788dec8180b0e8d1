//! Admin authentication
//!
//! Password check against an Argon2 hash (or the development password when no
//! hash is configured outside production), token issuance, and bearer token
//! verification. Failed logins are delayed by a fixed interval; there is no
//! rate limiting, lockout or audit log.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::jwt::{ADMIN_ROLE, JwtService, SessionClaims};
use crate::config::{AuthConfig, Environment};
use crate::errors::{PortfolioError, Result};
use crate::utils::password::{constant_time_eq, verify_password};

/// Where the expected password comes from
#[derive(Debug, Clone)]
enum PasswordSource {
    Hash(String),
    Development(String),
    Missing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub sub: String,
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        let role = claims.role_name().unwrap_or_default().to_string();
        Self {
            sub: claims.sub,
            role,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}

pub struct AuthService {
    jwt: JwtService,
    password: PasswordSource,
    failure_delay: Duration,
}

impl AuthService {
    pub fn new(jwt: JwtService, auth: &AuthConfig, environment: Environment) -> Self {
        let password = match auth.password_hash.as_deref().filter(|h| !h.is_empty()) {
            Some(hash) => PasswordSource::Hash(hash.to_string()),
            None if environment.is_production() => {
                error!("ADMIN_PASSWORD_HASH is not set; admin login is disabled in production");
                PasswordSource::Missing
            }
            None => {
                warn!("ADMIN_PASSWORD_HASH is not set; accepting the development password");
                PasswordSource::Development(auth.dev_password.clone())
            }
        };

        Self {
            jwt,
            password,
            failure_delay: Duration::from_millis(auth.failure_delay_ms),
        }
    }

    pub fn from_config(auth: &AuthConfig, environment: Environment) -> Self {
        let jwt = JwtService::from_config(auth, environment.is_production());
        Self::new(jwt, auth, environment)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Check the password and issue an admin session token
    pub async fn authenticate(&self, password: &str) -> Result<IssuedToken> {
        if password.trim().is_empty() {
            return Err(PortfolioError::validation("Password is required"));
        }

        let valid = match &self.password {
            PasswordSource::Hash(hash) => verify_password(password, hash).map_err(|e| {
                error!("Admin password hash is unusable: {}", e);
                PortfolioError::config("Authentication is misconfigured")
            })?,
            PasswordSource::Development(expected) => constant_time_eq(password, expected),
            PasswordSource::Missing => {
                return Err(PortfolioError::config("Authentication is not configured"));
            }
        };

        if !valid {
            warn!("Admin login failed - invalid password");
            // 固定延迟，粗略抵御暴力破解
            tokio::time::sleep(self.failure_delay).await;
            return Err(PortfolioError::unauthorized("Invalid password"));
        }

        let token = self.jwt.issue(ADMIN_ROLE)?;
        info!("Admin login successful");
        Ok(IssuedToken {
            token,
            expires_in: self.jwt.ttl_seconds(),
        })
    }

    /// Verify an `Authorization` header value and require the admin role
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<SessionUser> {
        let token = extract_bearer(header)
            .ok_or_else(|| PortfolioError::unauthorized("Missing or malformed Authorization header"))?;
        let claims = self.jwt.verify_admin(token)?;
        Ok(claims.into())
    }
}

/// `Bearer <token>` → `<token>`
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
