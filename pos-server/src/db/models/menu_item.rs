//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu categories (fixed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MenuCategory {
    Biriyani,
    #[serde(rename = "Rice Items")]
    RiceItems,
    #[serde(rename = "Fish Items")]
    FishItems,
    #[serde(rename = "Chicken Items")]
    ChickenItems,
    #[serde(rename = "Beef Items")]
    BeefItems,
    #[serde(rename = "Mutton Items")]
    MuttonItems,
    Drinks,
    #[serde(rename = "Fast Foods")]
    FastFoods,
    #[serde(rename = "Kacchi Package")]
    KacchiPackage,
    Others,
}

impl MenuCategory {
    /// All categories, in menu display order
    pub const ALL: [MenuCategory; 10] = [
        MenuCategory::Biriyani,
        MenuCategory::RiceItems,
        MenuCategory::FishItems,
        MenuCategory::ChickenItems,
        MenuCategory::BeefItems,
        MenuCategory::MuttonItems,
        MenuCategory::Drinks,
        MenuCategory::FastFoods,
        MenuCategory::KacchiPackage,
        MenuCategory::Others,
    ];
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    pub category: MenuCategory,
    /// Unit price
    pub price: f64,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub title: String,
    pub category: MenuCategory,
    pub price: f64,
    pub description: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MenuCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
