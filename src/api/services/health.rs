use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, trace};

use crate::services::AnalyticsService;
use crate::storage::ContentStore;

use super::helpers::success_response;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub storage_backend: &'static str,
    pub content_blocks: usize,
    pub analytics_events: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub version: &'static str,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 只读内存状态，不触碰存储后端，保证探针响应足够快。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        store: web::Data<ContentStore>,
        analytics: web::Data<AnalyticsService>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let now = Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let body = HealthResponse {
            status: "healthy",
            timestamp: now.to_rfc3339(),
            uptime,
            version: env!("CARGO_PKG_VERSION"),
            checks: HealthChecks {
                storage_backend: store.backend_name(),
                content_blocks: store.len(),
                analytics_events: analytics.len(),
            },
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        debug!("Health check completed, uptime: {}s", uptime);
        success_response(&body)
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
