//! Records held by the content and commerce stores
//!
//! JSON field names follow the browser-side shapes (camelCase), so the same
//! documents can be mirrored between local storage and the server.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, EnumIter};

/// Browser storage keys the stores are persisted under
pub mod keys {
    pub const CMS_CONTENT: &str = "imperial_cms_content";
    pub const CMS_CONFIG: &str = "imperial_cms_config";
    pub const TEMPLATES: &str = "imperial_templates";
}

// ============ CMS ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 其余任意字段（作者、标签等）原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 内容块：id + 类型标签 + 任意 JSON 内容 + 元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Value,
    pub metadata: ContentMetadata,
}

/// Body accepted when writing a block; timestamps are owned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsConfig {
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            site_title: default_site_title(),
            tagline: String::new(),
            theme: default_theme(),
            maintenance_mode: false,
            features: BTreeMap::new(),
        }
    }
}

fn default_site_title() -> String {
    "Imperial Portfolio".to_string()
}

fn default_theme() -> String {
    "sith".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTemplate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub default_content: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub default_content: Value,
}

/// Whole-store snapshot used by export/import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmsSnapshot {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub config: CmsConfig,
    #[serde(default)]
    pub templates: Vec<ContentTemplate>,
}

// ============ Commerce ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductCategory {
    Apparel,
    Collectibles,
    Prints,
    Digital,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    /// 价格（分）
    pub price_cents: u64,
    pub in_stock: bool,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: u64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_cents(&self) -> u64 {
        self.unit_price_cents * u64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub subtotal_cents: u64,
    pub item_count: u32,
    /// 最近一次修改时间，购物车淘汰依据
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            updated_at: Utc::now(),
            ..Default::default()
        }
    }

    /// Refresh totals and the modification time after the items changed
    pub(crate) fn recalculate(&mut self) {
        self.subtotal_cents = self.items.iter().map(CartItem::line_total_cents).sum();
        self.item_count = self.items.iter().map(|i| i.quantity).sum();
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Pending,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total_cents: u64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_block_wire_shape() {
        let block: ContentBlock = serde_json::from_value(json!({
            "id": "hero",
            "type": "hero",
            "content": {"title": "Join the Empire"},
            "metadata": {
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-02T00:00:00Z",
                "author": "vader"
            }
        }))
        .unwrap();

        assert_eq!(block.kind, "hero");
        assert_eq!(block.metadata.extra["author"], "vader");

        let back = serde_json::to_value(&block).unwrap();
        assert_eq!(back["type"], "hero");
        assert_eq!(back["metadata"]["author"], "vader");
        assert!(back["metadata"]["createdAt"].is_string());
    }

    #[test]
    fn test_cart_recalculate() {
        let mut cart = Cart::empty("u1");
        cart.items.push(CartItem {
            product_id: "p1".into(),
            name: "Mug".into(),
            unit_price_cents: 1500,
            quantity: 2,
        });
        cart.items.push(CartItem {
            product_id: "p2".into(),
            name: "Print".into(),
            unit_price_cents: 999,
            quantity: 1,
        });
        cart.recalculate();
        assert_eq!(cart.subtotal_cents, 3999);
        assert_eq!(cart.item_count, 3);
    }
}
