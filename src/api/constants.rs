//! API 模块常量定义

/// Cookie carrying the session token, same name as the browser sessionStorage key
pub const SESSION_COOKIE_NAME: &str = "imperial_session_token";

/// Request/response header used for request correlation
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied request id that is echoed back
pub const MAX_REQUEST_ID_LEN: usize = 64;

/// JSON body limit for CMS writes and imports
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;
