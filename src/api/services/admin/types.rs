//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::services::SessionUser;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Serialize, Clone, Debug)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: SessionUser,
}
