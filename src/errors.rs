use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    TokenExpired(String),
    NotFound(String),
    Conflict(String),
    Storage(String),
    Serialization(String),
    Config(String),
    Internal(String),
}

/// JSON body written for every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub code: &'static str,
}

impl PortfolioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PortfolioError::Validation(_) => "E001",
            PortfolioError::Unauthorized(_) => "E002",
            PortfolioError::Forbidden(_) => "E003",
            PortfolioError::TokenExpired(_) => "E004",
            PortfolioError::NotFound(_) => "E005",
            PortfolioError::Conflict(_) => "E006",
            PortfolioError::Storage(_) => "E007",
            PortfolioError::Serialization(_) => "E008",
            PortfolioError::Config(_) => "E009",
            PortfolioError::Internal(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PortfolioError::Validation(_) => "Validation Error",
            PortfolioError::Unauthorized(_) => "Unauthorized",
            PortfolioError::Forbidden(_) => "Forbidden",
            PortfolioError::TokenExpired(_) => "Token Expired",
            PortfolioError::NotFound(_) => "Resource Not Found",
            PortfolioError::Conflict(_) => "Conflict",
            PortfolioError::Storage(_) => "Storage Error",
            PortfolioError::Serialization(_) => "Serialization Error",
            PortfolioError::Config(_) => "Configuration Error",
            PortfolioError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PortfolioError::Validation(msg)
            | PortfolioError::Unauthorized(msg)
            | PortfolioError::Forbidden(msg)
            | PortfolioError::TokenExpired(msg)
            | PortfolioError::NotFound(msg)
            | PortfolioError::Conflict(msg)
            | PortfolioError::Storage(msg)
            | PortfolioError::Serialization(msg)
            | PortfolioError::Config(msg)
            | PortfolioError::Internal(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            PortfolioError::Validation(_) => StatusCode::BAD_REQUEST,
            PortfolioError::Unauthorized(_) | PortfolioError::TokenExpired(_) => {
                StatusCode::UNAUTHORIZED
            }
            PortfolioError::Forbidden(_) => StatusCode::FORBIDDEN,
            PortfolioError::NotFound(_) => StatusCode::NOT_FOUND,
            PortfolioError::Conflict(_) => StatusCode::CONFLICT,
            PortfolioError::Storage(_)
            | PortfolioError::Serialization(_)
            | PortfolioError::Config(_)
            | PortfolioError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 CLI）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PortfolioError {}

impl ResponseError for PortfolioError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status())
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ErrorBody {
                error: self.message(),
                code: self.code(),
            })
    }
}

// 便捷的构造函数
impl PortfolioError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Forbidden(msg.into())
    }

    pub fn token_expired<T: Into<String>>(msg: T) -> Self {
        PortfolioError::TokenExpired(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PortfolioError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Conflict(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Storage(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Config(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Internal(msg.into())
    }
}

impl From<std::io::Error> for PortfolioError {
    fn from(err: std::io::Error) -> Self {
        PortfolioError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        PortfolioError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for PortfolioError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => PortfolioError::TokenExpired("Token has expired".into()),
            _ => PortfolioError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

impl From<crate::utils::password::PasswordError> for PortfolioError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        PortfolioError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
