//! Expense Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Expense categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseCategory {
    #[serde(rename = "rawMaterials")]
    RawMaterials,
    #[serde(rename = "utilityBills")]
    UtilityBills,
    #[serde(rename = "others")]
    Others,
}

/// Expense entity
///
/// `total_amount` is always amount × amount_per_unit when a per-unit
/// value is set, else amount; recomputed on every create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub amount_per_unit: Option<f64>,
    pub total_amount: f64,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: Option<String>,
    /// Soft-delete flag; deleted rows stay for reporting
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_deleted: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create expense payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub amount_per_unit: Option<f64>,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update expense payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
