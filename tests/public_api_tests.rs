//! Robots, sitemap, analytics and health endpoint tests

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::{context_with, test_config, test_context};

#[actix_rt::test]
async fn test_robots_points_at_sitemap() {
    let mut config = test_config();
    config.site.base_url = "https://vader.dev/".to_string();
    let ctx = context_with(config).await;
    let app = test_app!(ctx);

    let req = TestRequest::get().uri("/api/robots").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Sitemap: https://vader.dev/sitemap.xml"));
    assert!(body.contains("Disallow: /admin"));
}

#[actix_rt::test]
async fn test_sitemap_lists_pages() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::get().uri("/api/sitemap").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("application/xml"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("<urlset"));
    assert!(body.contains("<loc>http://localhost:3000/</loc>"));
}

#[actix_rt::test]
async fn test_analytics_ingest_and_summary() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    for page in ["/", "/", "/#projects"] {
        let req = TestRequest::post()
            .uri("/api/analytics")
            .set_json(json!({"event": "page_view", "page": page, "userId": "visitor_1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert!(body["id"].is_string());
    }

    let req = TestRequest::get().uri("/api/analytics?days=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["periodDays"], 1);
    assert_eq!(summary["totalEvents"], 3);
    assert_eq!(summary["uniqueUsers"], 1);
    assert_eq!(summary["eventsByType"]["page_view"], 3);
    assert_eq!(summary["dailyCounts"].as_array().unwrap().len(), 1);
    assert_eq!(summary["topPages"][0]["page"], "/");
    assert_eq!(summary["topPages"][0]["count"], 2);
}

#[actix_rt::test]
async fn test_analytics_validation() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/analytics")
        .set_json(json!({"page": "/"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    for query in ["days=abc", "days=0", "days=9999"] {
        let req = TestRequest::get()
            .uri(&format!("/api/analytics?{}", query))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST,
            "{}",
            query
        );
    }

    // 默认窗口 7 天
    let req = TestRequest::get().uri("/api/analytics").to_request();
    let summary: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(summary["periodDays"], 7);
    assert_eq!(summary["dailyCounts"].as_array().unwrap().len(), 7);
}

#[actix_rt::test]
async fn test_health_and_request_id() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storageBackend"], "memory");
    assert_eq!(body["checks"]["contentBlocks"], 0);

    let req = TestRequest::get()
        .uri("/health/live")
        .insert_header(("X-Request-ID", "trace-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "trace-42"
    );
}

#[actix_rt::test]
async fn test_unknown_route_is_404() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::get().uri("/api/deathstar/plans").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
