//! Coupon Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Coupon entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Unique coupon code
    pub code: String,
    pub discount_percentage: f64,
    /// RFC 3339; coupons without one never expire
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Create coupon payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponCreate {
    pub code: String,
    pub discount_percentage: f64,
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Update coupon payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Apply coupon request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponApply {
    pub code: String,
    pub total_amount: f64,
}

/// Result of applying a coupon to a bill total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponApplied {
    pub coupon_code: String,
    pub discount_amount: f64,
    pub total_with_discount: f64,
}
