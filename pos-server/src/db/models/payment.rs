//! Payment Model
//!
//! Cash payment records written after the order manager marks an order
//! paid. Recording only; no gateway integration.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payment processing state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Payment record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Core order id (the orders collection lives outside SurrealDB)
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub method: String,
    pub created_at: Option<String>,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub order_id: String,
    pub amount: f64,
}
