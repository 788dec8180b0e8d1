//! Shared setup for the HTTP integration tests

#![allow(dead_code)]

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use imperial_portfolio::config::{AuthConfig, StaticConfig, StorageBackendKind};
use imperial_portfolio::runtime::lifetime::{StartupContext, prepare_server_startup};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const DEV_PASSWORD: &str = "darth2024";

/// Development config with an in-memory backend and no failure delay
pub fn test_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.storage.backend = StorageBackendKind::Memory;
    config.auth = AuthConfig {
        jwt_secret: Some(TEST_SECRET.to_string()),
        failure_delay_ms: 0,
        ..Default::default()
    };
    config
}

pub async fn test_context() -> StartupContext {
    context_with(test_config()).await
}

pub async fn context_with(config: StaticConfig) -> StartupContext {
    prepare_server_startup(&config)
        .await
        .expect("Failed to prepare test context")
}

/// Sign arbitrary claims with the test secret
pub fn sign(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn admin_token() -> String {
    let now = Utc::now().timestamp();
    sign(json!({
        "sub": "admin",
        "role": "admin",
        "iat": now,
        "exp": now + 3600,
        "jti": "test"
    }))
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Build a test service with the production middleware that matters for
/// assertions (request ids) and all routes registered
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {{
        let ctx = $ctx.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(imperial_portfolio::api::middleware::RequestIdMiddleware)
                .configure(move |cfg| ctx.configure(cfg)),
        )
        .await
    }};
}
