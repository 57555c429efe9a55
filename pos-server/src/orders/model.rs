//! Order Model
//!
//! 订单实体与生命周期状态。订单只持有桌台/座位的弱引用（by id），
//! 从不拥有它们。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle status
///
/// {Pending, In Progress} → Ready → Completed, with Cancelled reachable
/// from any non-terminal state. Ready, Completed and Cancelled all trigger
/// seat release.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses accept no further lifecycle transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether entering this status releases the order's seats
    pub fn releases_seats(&self) -> bool {
        matches!(
            self,
            OrderStatus::Ready | OrderStatus::Completed | OrderStatus::Cancelled
        )
    }
}

/// Order type; only Dine In orders bind seats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderType {
    #[serde(rename = "Dine In")]
    DineIn,
    #[serde(rename = "Take Away")]
    TakeAway,
}

/// Customer-facing details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Ticket serial number shown to the customer
    pub serial_number: String,
    #[serde(default)]
    pub guests: Option<u32>,
}

/// A line item. `price` is the unit price; line total is price × quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Applied coupon discount. Absent means no discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub coupon_code: String,
    pub amount: f64,
}

/// Bill breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bills {
    /// Item subtotal
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    pub total_with_discount: f64,
}

/// Snapshot of the table an order is seated at (id + number)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRef {
    pub id: String,
    pub table_no: u32,
}

/// Weak reference to one seat on one table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatRef {
    pub table_id: String,
    pub seat_number: u32,
}

/// Order entity
///
/// For Dine In orders every `seats` entry points at a seat whose
/// `order_id` equals this order's id while the order is active; the seat
/// list is kept afterwards as a historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_details: CustomerDetails,
    pub order_status: OrderStatus,
    pub order_type: OrderType,
    pub order_date: DateTime<Utc>,
    pub bills: Bills,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub table: Option<TableRef>,
    #[serde(default)]
    pub seats: Vec<SeatRef>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new unpaid order from a validated create payload
    pub fn from_create(payload: OrderCreate, table: Option<TableRef>) -> Self {
        let now = Utc::now();
        let order_type = payload.order_type.unwrap_or(OrderType::DineIn);
        let seats = match order_type {
            OrderType::DineIn => payload.seats,
            OrderType::TakeAway => Vec::new(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            customer_details: payload.customer_details,
            order_status: payload.order_status.unwrap_or(OrderStatus::Pending),
            order_type,
            order_date: now,
            bills: payload.bills,
            items: payload.items,
            table,
            seats,
            payment_method: None,
            is_paid: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_details: CustomerDetails,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub bills: Bills,
    /// Required and non-empty iff the order type is Dine In
    #[serde(default)]
    pub seats: Vec<SeatRef>,
}

/// General order update payload (status, payment, fields)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

/// Bill override supplied alongside item edits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillsOverride {
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub total_with_discount: Option<f64>,
}

/// Append items payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAddItems {
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub table: Option<TableRef>,
    #[serde(default)]
    pub bills: Option<BillsOverride>,
}

/// Wholesale item replacement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReplaceItems {
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub bills: Option<BillsOverride>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub table: Option<TableRef>,
    /// Replacement seat set; routed through the same availability checks
    /// as order creation
    #[serde(default)]
    pub seats: Option<Vec<SeatRef>>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_labels() {
        assert_eq!(
            serde_json::to_value(OrderStatus::InProgress).unwrap(),
            "In Progress"
        );
        assert_eq!(serde_json::to_value(OrderType::DineIn).unwrap(), "Dine In");
        assert_eq!(
            serde_json::to_value(OrderType::TakeAway).unwrap(),
            "Take Away"
        );
    }

    #[test]
    fn release_triggering_statuses() {
        assert!(OrderStatus::Ready.releases_seats());
        assert!(OrderStatus::Completed.releases_seats());
        assert!(OrderStatus::Cancelled.releases_seats());
        assert!(!OrderStatus::Pending.releases_seats());
        assert!(!OrderStatus::InProgress.releases_seats());
    }

    #[test]
    fn take_away_orders_never_carry_seats() {
        let payload = OrderCreate {
            customer_details: CustomerDetails {
                serial_number: "S-1".into(),
                guests: Some(1),
            },
            order_status: None,
            order_type: Some(OrderType::TakeAway),
            items: vec![],
            bills: Bills {
                total: 0.0,
                discount: None,
                total_with_discount: 0.0,
            },
            seats: vec![SeatRef {
                table_id: "t".into(),
                seat_number: 1,
            }],
        };
        let order = Order::from_create(payload, None);
        assert!(order.seats.is_empty());
        assert!(!order.is_paid);
        assert_eq!(order.order_status, OrderStatus::Pending);
    }
}
