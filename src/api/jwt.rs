//! 会话 token 的签发与校验（HS256）

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::AuthConfig;
use crate::errors::{PortfolioError, Result};

/// Role claim granting access to the admin panel
pub const ADMIN_ROLE: &str = "admin";

/// Secret used in development when `JWT_SECRET` is unset
const DEV_JWT_SECRET: &str = "imperial-dev-secret-change-me";

/// Session Token Claims
///
/// Only `exp` is mandatory. Tokens minted by the browser-side site carry just
/// `{role, iat, exp}`, and `role` may hold any JSON value; a decode failure
/// must mean a bad signature, format or expiry, never a role problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default)]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(default)]
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub jti: String,
}

impl SessionClaims {
    /// `role` as a string, if it is one
    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().and_then(Value::as_str)
    }

    pub fn is_admin(&self) -> bool {
        self.role_name() == Some(ADMIN_ROLE)
    }
}

/// JWT Service for issuing and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, ttl_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Create JwtService from the auth section of the static config
    pub fn from_config(auth: &AuthConfig, production: bool) -> Self {
        let secret = match auth.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None if production => {
                warn!("JWT_SECRET not configured, generating a random secret; sessions will not survive a restart");
                crate::utils::generate_secure_token(32)
            }
            None => {
                warn!("JWT_SECRET not configured, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Self::new(&secret, auth.token_ttl_minutes)
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_minutes * 60
    }

    /// Sign a session token carrying the given role
    pub fn issue(&self, role: &str) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: role.to_string(),
            role: Some(Value::String(role.to_string())),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.ttl_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| PortfolioError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature and expiry, without looking at the role
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        // 过期即失效，不留宽限
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify and additionally require the admin role
    pub fn verify_admin(&self, token: &str) -> Result<SessionClaims> {
        let claims = self.verify(token)?;
        if !claims.is_admin() {
            return Err(PortfolioError::forbidden("Admin role required"));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 120)
    }

    fn sign_raw(claims: &impl Serialize) -> String {
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        encode(&Header::default(), claims, &key).unwrap()
    }

    #[test]
    fn test_issue_and_verify_admin_token() {
        let service = create_test_service();
        let token = service.issue(ADMIN_ROLE).unwrap();
        let claims = service.verify_admin(&token).unwrap();

        assert_eq!(claims.role_name(), Some("admin"));
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        let result = service.verify("invalid.token.here");
        assert!(matches!(result, Err(PortfolioError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = create_test_service();
        let other = JwtService::new("different_secret_key_32_bytes!!", 120);

        let token = issuer.issue(ADMIN_ROLE).unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(PortfolioError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let token = sign_raw(&SessionClaims {
            sub: "admin".to_string(),
            role: Some(Value::from("admin")),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        });

        assert!(matches!(
            service.verify(&token),
            Err(PortfolioError::TokenExpired(_))
        ));
    }

    #[test]
    fn test_token_without_role_is_forbidden() {
        let service = create_test_service();
        let now = Utc::now();
        let token = sign_raw(&serde_json::json!({
            "sub": "visitor",
            "iat": now.timestamp(),
            "exp": (now + Duration::minutes(5)).timestamp(),
            "jti": "abc",
        }));

        let claims = service.verify(&token).unwrap();
        assert!(claims.role.is_none());
        assert!(matches!(
            service.verify_admin(&token),
            Err(PortfolioError::Forbidden(_))
        ));
    }

    #[test]
    fn test_minimal_claims_reach_role_check() {
        let service = create_test_service();
        let now = Utc::now().timestamp();

        let admin = sign_raw(&serde_json::json!({"role": "admin", "iat": now, "exp": now + 300}));
        let claims = service.verify_admin(&admin).unwrap();
        assert!(claims.sub.is_empty());
        assert!(claims.jti.is_empty());

        for claims in [
            serde_json::json!({"role": "user", "iat": now, "exp": now + 300}),
            serde_json::json!({"iat": now, "exp": now + 300}),
            serde_json::json!({"role": 5, "iat": now, "exp": now + 300}),
            serde_json::json!({"role": ["admin"], "exp": now + 300}),
        ] {
            assert!(matches!(
                service.verify_admin(&sign_raw(&claims)),
                Err(PortfolioError::Forbidden(_))
            ));
        }
    }

    #[test]
    fn test_development_secret_is_stable() {
        let auth = AuthConfig::default();
        let a = JwtService::from_config(&auth, false);
        let b = JwtService::from_config(&auth, false);

        let token = a.issue(ADMIN_ROLE).unwrap();
        assert!(b.verify_admin(&token).is_ok());
    }

    #[test]
    fn test_production_without_secret_uses_random_secret() {
        let auth = AuthConfig::default();
        let a = JwtService::from_config(&auth, true);
        let b = JwtService::from_config(&auth, true);

        let token = a.issue(ADMIN_ROLE).unwrap();
        assert!(b.verify(&token).is_err());
    }
}
