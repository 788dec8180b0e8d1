//! Shop simulation
//!
//! A fixed sample catalogue, per-visitor carts and orders that stay `pending`
//! forever. No payment is captured and stock is never decremented. Carts and
//! orders are capped by `[shop]`; inserting past the cap evicts the entry that
//! was touched least recently.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info};

use super::models::{Cart, CartItem, CustomerInfo, Order, OrderStatus, Product, ProductCategory};
use crate::config::ShopConfig;
use crate::errors::{PortfolioError, Result};
use crate::utils::{generate_random_code, is_valid_identifier};

/// 单个商品在购物车中的最大数量
pub const MAX_QUANTITY: u32 = 99;

pub struct CommerceStore {
    products: Vec<Product>,
    carts: DashMap<String, Cart>,
    orders: DashMap<String, Order>,
    max_carts: usize,
    max_orders: usize,
}

impl Default for CommerceStore {
    fn default() -> Self {
        Self::with_catalog(sample_catalog(), &ShopConfig::default())
    }
}

impl CommerceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ShopConfig) -> Self {
        Self::with_catalog(sample_catalog(), config)
    }

    pub fn with_catalog(products: Vec<Product>, config: &ShopConfig) -> Self {
        info!(
            "Shop catalogue loaded with {} products (max {} carts, {} orders)",
            products.len(),
            config.max_carts,
            config.max_orders
        );
        Self {
            products,
            carts: DashMap::new(),
            orders: DashMap::new(),
            max_carts: config.max_carts.max(1),
            max_orders: config.max_orders.max(1),
        }
    }

    pub fn cart_count(&self) -> usize {
        self.carts.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// 生成访客 ID（对应前端 imperial_user_id）
    pub fn new_visitor_id() -> String {
        format!("visitor_{}", uuid::Uuid::new_v4().simple())
    }

    pub fn products(&self, category: Option<ProductCategory>) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect()
    }

    pub fn product(&self, id: &str) -> Result<Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PortfolioError::not_found(format!("Product '{}' not found", id)))
    }

    pub fn cart(&self, user_id: &str) -> Result<Cart> {
        validate_user(user_id)?;
        Ok(self
            .carts
            .get(user_id)
            .map(|c| c.clone())
            .unwrap_or_else(|| Cart::empty(user_id)))
    }

    /// Add `quantity` of a product, merging with an existing line
    pub fn add_to_cart(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<Cart> {
        validate_user(user_id)?;
        let product = self.product(product_id)?;
        if !product.in_stock {
            return Err(PortfolioError::conflict(format!(
                "Product '{}' is out of stock",
                product_id
            )));
        }
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(PortfolioError::validation(format!(
                "Quantity must be between 1 and {}",
                MAX_QUANTITY
            )));
        }

        // 淘汰必须在拿到 entry 之前完成，否则同分片会死锁
        if !self.carts.contains_key(user_id) {
            evict_oldest(&self.carts, self.max_carts, |c| c.updated_at);
        }

        let mut entry = self
            .carts
            .entry(user_id.to_string())
            .or_insert_with(|| Cart::empty(user_id));
        let cart = entry.value_mut();

        match cart.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                let merged = item.quantity + quantity;
                if merged > MAX_QUANTITY {
                    return Err(PortfolioError::validation(format!(
                        "Quantity must be between 1 and {}",
                        MAX_QUANTITY
                    )));
                }
                item.quantity = merged;
            }
            None => cart.items.push(CartItem {
                product_id: product.id,
                name: product.name,
                unit_price_cents: product.price_cents,
                quantity,
            }),
        }
        cart.recalculate();
        Ok(cart.clone())
    }

    pub fn remove_from_cart(&self, user_id: &str, product_id: &str) -> Result<Cart> {
        validate_user(user_id)?;
        let mut cart = self
            .carts
            .get_mut(user_id)
            .ok_or_else(|| PortfolioError::not_found("Cart is empty"))?;

        let before = cart.items.len();
        cart.items.retain(|i| i.product_id != product_id);
        if cart.items.len() == before {
            return Err(PortfolioError::not_found(format!(
                "Product '{}' is not in the cart",
                product_id
            )));
        }
        cart.recalculate();
        Ok(cart.clone())
    }

    pub fn clear_cart(&self, user_id: &str) -> Result<()> {
        validate_user(user_id)?;
        self.carts.remove(user_id);
        Ok(())
    }

    /// Turn the visitor's cart into a pending order and empty the cart
    pub fn checkout(&self, user_id: &str, customer: CustomerInfo) -> Result<Order> {
        validate_user(user_id)?;
        let cart = match self.carts.remove(user_id) {
            Some((_, cart)) if !cart.items.is_empty() => cart,
            _ => return Err(PortfolioError::validation("Cannot check out an empty cart")),
        };

        let order = Order {
            id: format!("ORD-{}", generate_random_code(10).to_uppercase()),
            user_id: user_id.to_string(),
            total_cents: cart.subtotal_cents,
            items: cart.items,
            status: OrderStatus::Pending,
            customer_name: customer.name.filter(|s| !s.trim().is_empty()),
            customer_email: customer.email.filter(|s| !s.trim().is_empty()),
            created_at: Utc::now(),
        };
        evict_oldest(&self.orders, self.max_orders, |o| o.created_at);
        self.orders.insert(order.id.clone(), order.clone());
        info!(
            "Order {} placed by {} ({} cents)",
            order.id, user_id, order.total_cents
        );
        Ok(order)
    }

    pub fn order(&self, order_id: &str) -> Result<Order> {
        self.orders
            .get(order_id)
            .map(|o| o.clone())
            .ok_or_else(|| PortfolioError::not_found(format!("Order '{}' not found", order_id)))
    }

    /// Orders of one visitor, newest first
    pub fn orders_for(&self, user_id: &str) -> Result<Vec<Order>> {
        validate_user(user_id)?;
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .map(|o| o.clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

/// Make room for one more entry by dropping the oldest ones
fn evict_oldest<V>(map: &DashMap<String, V>, max: usize, stamp: impl Fn(&V) -> DateTime<Utc>) {
    while map.len() >= max {
        let oldest = map
            .iter()
            .min_by_key(|e| stamp(e.value()))
            .map(|e| e.key().clone());
        match oldest {
            Some(key) => {
                map.remove(&key);
                debug!("Shop store full, evicted '{}'", key);
            }
            None => break,
        }
    }
}

fn validate_user(user_id: &str) -> Result<()> {
    if is_valid_identifier(user_id) {
        Ok(())
    } else {
        Err(PortfolioError::validation(format!(
            "Invalid visitor id '{}'",
            user_id
        )))
    }
}

fn product(
    id: &str,
    name: &str,
    description: &str,
    category: ProductCategory,
    price_cents: u64,
    in_stock: bool,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        price_cents,
        in_stock,
        image: format!("/images/shop/{}.webp", id),
    }
}

/// 内置示例商品
pub fn sample_catalog() -> Vec<Product> {
    use ProductCategory::*;
    vec![
        product(
            "imperial-hoodie",
            "Imperial Engineer Hoodie",
            "Black hoodie with the cog insignia, for late-night deploys on the Death Star.",
            Apparel,
            5900,
            true,
        ),
        product(
            "sith-tee",
            "Sith Developer Tee",
            "\"I find your lack of tests disturbing.\" Organic cotton.",
            Apparel,
            2900,
            true,
        ),
        product(
            "saber-keychain",
            "Red Saber Keychain",
            "LED keychain in crimson. Batteries included, kyber crystal not.",
            Collectibles,
            1500,
            true,
        ),
        product(
            "death-star-mug",
            "Death Star Mug",
            "Fully operational coffee station. Thermal exhaust port sealed.",
            Collectibles,
            1800,
            true,
        ),
        product(
            "star-destroyer-print",
            "Star Destroyer Blueprint Print",
            "A2 blueprint-style print of an Imperial-class hull.",
            Prints,
            3500,
            false,
        ),
        product(
            "holocron-wallpapers",
            "Holocron Wallpaper Pack",
            "Twelve 4K wallpapers rendered from the site's 3D scenes.",
            Digital,
            500,
            true,
        ),
    ]
}
