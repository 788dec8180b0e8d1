//! Service layer behind the HTTP API

pub mod analytics_service;
pub mod auth_service;

pub use analytics_service::{AnalyticsEvent, AnalyticsService, AnalyticsSummary, EventInput};
pub use auth_service::{AuthService, IssuedToken, SessionUser, extract_bearer};
