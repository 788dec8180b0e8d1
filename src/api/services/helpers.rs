//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::api::constants::JSON_BODY_LIMIT;
use crate::errors::PortfolioError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: &T) -> HttpResponse {
    json_response(StatusCode::OK, data)
}

pub fn created_response<T: Serialize>(data: &T) -> HttpResponse {
    json_response(StatusCode::CREATED, data)
}

/// JSON body extractor config: malformed bodies become 400 with the usual error shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            PortfolioError::validation(format!("Invalid JSON body: {}", err)).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        PortfolioError::validation(format!("Invalid query string: {}", err)).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        PortfolioError::validation(format!("Invalid path: {}", err)).into()
    })
}
