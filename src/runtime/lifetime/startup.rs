use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::services::{AppStartTime, api_routes, health_routes, json_config, path_config, query_config};
use crate::config::{SiteConfig, StaticConfig};
use crate::services::{AnalyticsService, AuthService};
use crate::storage::{CommerceStore, ContentStore, create_backend};

/// 服务器运行所需的共享状态
///
/// Every field is a `web::Data` so workers share one instance.
#[derive(Clone)]
pub struct StartupContext {
    pub content: web::Data<ContentStore>,
    pub commerce: web::Data<CommerceStore>,
    pub analytics: web::Data<AnalyticsService>,
    pub auth: web::Data<AuthService>,
    pub site: web::Data<SiteConfig>,
    pub app_start_time: web::Data<AppStartTime>,
}

impl StartupContext {
    /// Register shared state, extractor configs and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.content.clone())
            .app_data(self.commerce.clone())
            .app_data(self.analytics.clone())
            .app_data(self.auth.clone())
            .app_data(self.site.clone())
            .app_data(self.app_start_time.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(health_routes())
            .service(api_routes());
    }
}

/// 准备服务器启动的上下文：存储后端、内容库、认证与统计服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let backend = create_backend(&config.storage)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", backend.backend_name());

    let content = ContentStore::open(backend)
        .await
        .context("Failed to load CMS content")?;
    info!("CMS content loaded: {} blocks", content.len());

    let auth = AuthService::from_config(&config.auth, config.environment);
    let analytics = AnalyticsService::new(&config.analytics);
    let commerce = CommerceStore::from_config(&config.shop);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        content: web::Data::new(content),
        commerce: web::Data::new(commerce),
        analytics: web::Data::new(analytics),
        auth: web::Data::new(auth),
        site: web::Data::new(config.site.clone()),
        app_start_time: web::Data::new(AppStartTime::now()),
    })
}
