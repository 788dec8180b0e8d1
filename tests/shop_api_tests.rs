//! Shop simulation API integration tests

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::test_context;

#[actix_rt::test]
async fn test_catalogue_and_filters() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::get().uri("/api/shop/products").to_request();
    let all: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(all.as_array().unwrap().len(), 6);

    let req = TestRequest::get()
        .uri("/api/shop/products?category=apparel")
        .to_request();
    let apparel: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(
        apparel
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["category"] == "apparel")
    );

    let req = TestRequest::get()
        .uri("/api/shop/products?category=blasters")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::get()
        .uri("/api/shop/products/sith-tee")
        .to_request();
    let product: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(product["priceCents"], 2900);

    let req = TestRequest::get()
        .uri("/api/shop/products/x-wing")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn test_cart_to_order_flow() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::post().uri("/api/shop/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let user = body["userId"].as_str().unwrap().to_string();
    assert!(user.starts_with("visitor_"));

    for (product, quantity) in [("sith-tee", 2), ("death-star-mug", 1)] {
        let req = TestRequest::post()
            .uri(&format!("/api/shop/cart/{}/items", user))
            .set_json(json!({"productId": product, "quantity": quantity}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = TestRequest::get()
        .uri(&format!("/api/shop/cart/{}", user))
        .to_request();
    let cart: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(cart["itemCount"], 3);
    assert_eq!(cart["subtotalCents"], 2 * 2900 + 1800);

    let req = TestRequest::delete()
        .uri(&format!("/api/shop/cart/{}/items/death-star-mug", user))
        .to_request();
    let cart: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(cart["subtotalCents"], 2 * 2900);

    let req = TestRequest::post()
        .uri(&format!("/api/shop/cart/{}/checkout", user))
        .set_json(json!({"name": "Anakin", "email": "ani@tatooine.example"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalCents"], 5800);
    let order_id = order["id"].as_str().unwrap().to_string();

    let req = TestRequest::get()
        .uri(&format!("/api/shop/orders/{}", order_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/api/shop/users/{}/orders", user))
        .to_request();
    let orders: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    // 结账后购物车为空，再次结账失败
    let req = TestRequest::post()
        .uri(&format!("/api/shop/cart/{}/checkout", user))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_cart_rejections() {
    let ctx = test_context().await;
    let app = test_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/shop/cart/u1/items")
        .set_json(json!({"productId": "star-destroyer-print", "quantity": 1}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = TestRequest::post()
        .uri("/api/shop/cart/u1/items")
        .set_json(json!({"productId": "sith-tee", "quantity": 0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::get()
        .uri("/api/shop/cart/bad%20user")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::delete().uri("/api/shop/cart/u1").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
}
