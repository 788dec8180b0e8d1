//! 商店模拟端点：商品目录、购物车、下单（不扣款、不扣库存）

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::errors::PortfolioError;
use crate::storage::{CommerceStore, CustomerInfo, ProductCategory};

use super::helpers::{created_response, success_response};

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorResponse {
    pub user_id: String,
}

/// POST /api/shop/users
pub async fn create_visitor() -> HttpResponse {
    created_response(&VisitorResponse {
        user_id: CommerceStore::new_visitor_id(),
    })
}

/// GET /api/shop/products[?category=C]
pub async fn list_products(
    shop: web::Data<CommerceStore>,
    query: web::Query<ProductQuery>,
) -> HttpResponse {
    success_response(&shop.products(query.category))
}

/// GET /api/shop/products/{id}
pub async fn get_product(
    shop: web::Data<CommerceStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    Ok(success_response(&shop.product(&id)?))
}

/// GET /api/shop/cart/{user}
pub async fn get_cart(
    shop: web::Data<CommerceStore>,
    user: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    Ok(success_response(&shop.cart(&user)?))
}

/// POST /api/shop/cart/{user}/items
pub async fn add_item(
    shop: web::Data<CommerceStore>,
    user: web::Path<String>,
    body: web::Json<AddItemRequest>,
) -> Result<HttpResponse, PortfolioError> {
    let cart = shop.add_to_cart(&user, &body.product_id, body.quantity)?;
    Ok(success_response(&cart))
}

/// DELETE /api/shop/cart/{user}/items/{product}
pub async fn remove_item(
    shop: web::Data<CommerceStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, PortfolioError> {
    let (user, product) = path.into_inner();
    Ok(success_response(&shop.remove_from_cart(&user, &product)?))
}

/// DELETE /api/shop/cart/{user}
pub async fn clear_cart(
    shop: web::Data<CommerceStore>,
    user: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    shop.clear_cart(&user)?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/shop/cart/{user}/checkout
pub async fn checkout(
    shop: web::Data<CommerceStore>,
    user: web::Path<String>,
    body: Option<web::Json<CustomerInfo>>,
) -> Result<HttpResponse, PortfolioError> {
    let customer = body.map(|b| b.into_inner()).unwrap_or_default();
    let order = shop.checkout(&user, customer)?;
    Ok(created_response(&order))
}

/// GET /api/shop/orders/{id}
pub async fn get_order(
    shop: web::Data<CommerceStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    Ok(success_response(&shop.order(&id)?))
}

/// GET /api/shop/users/{user}/orders
pub async fn list_orders(
    shop: web::Data<CommerceStore>,
    user: web::Path<String>,
) -> Result<HttpResponse, PortfolioError> {
    Ok(success_response(&shop.orders_for(&user)?))
}

/// 商店路由 `/shop`
pub fn shop_routes() -> actix_web::Scope {
    web::scope("/shop")
        .route("/users", web::post().to(create_visitor))
        .route("/users/{user}/orders", web::get().to(list_orders))
        .route("/products", web::get().to(list_products))
        .route("/products/{id}", web::get().to(get_product))
        .route("/cart/{user}", web::get().to(get_cart))
        .route("/cart/{user}", web::delete().to(clear_cart))
        .route("/cart/{user}/items", web::post().to(add_item))
        .route("/cart/{user}/items/{product}", web::delete().to(remove_item))
        .route("/cart/{user}/checkout", web::post().to(checkout))
        .route("/orders/{id}", web::get().to(get_order))
}
