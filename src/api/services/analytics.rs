//! 访问统计端点：事件上报与简单聚合

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::errors::PortfolioError;
use crate::services::{AnalyticsService, EventInput};

use super::helpers::{created_response, success_response};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
    pub id: String,
}

/// POST /api/analytics
pub async fn track_event(
    analytics: web::Data<AnalyticsService>,
    body: web::Json<EventInput>,
) -> Result<HttpResponse, PortfolioError> {
    let event = analytics.record(body.into_inner())?;
    Ok(created_response(&TrackResponse {
        success: true,
        id: event.id,
    }))
}

/// GET /api/analytics?days=N
pub async fn get_summary(
    analytics: web::Data<AnalyticsService>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, PortfolioError> {
    let days = analytics.resolve_days(query.days.as_deref())?;
    Ok(success_response(&analytics.summary(days)))
}

pub fn analytics_routes() -> actix_web::Resource {
    web::resource("/analytics")
        .route(web::post().to(track_event))
        .route(web::get().to(get_summary))
}
