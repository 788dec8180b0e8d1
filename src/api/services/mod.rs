pub mod admin;
pub mod analytics;
pub mod cms;
pub mod health;
pub mod helpers;
pub mod robots;
pub mod shop;

use actix_web::web;

pub use admin::admin_routes;
pub use analytics::analytics_routes;
pub use cms::cms_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{json_config, path_config, query_config};
pub use shop::shop_routes;

/// `/api` 下的全部路由
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(admin_routes())
        .service(analytics_routes())
        .service(cms_routes())
        .service(shop_routes())
        .route("/robots", web::get().to(robots::robots))
        .route("/sitemap", web::get().to(robots::sitemap))
}
