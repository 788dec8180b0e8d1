//! Admin API 服务模块：密码登录与会话 token 校验

pub mod auth;
pub mod routes;
mod types;

pub use auth::{authenticate, verify};
pub use routes::admin_routes;
pub use types::*;
