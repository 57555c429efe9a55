//! Dining Table Model
//!
//! 桌台与座位：status 由座位占用推导，每次持久化前重新计算。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Seat-level operation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FloorError {
    #[error("Seat {0} not found")]
    SeatNotFound(u32),

    #[error("Seat {0} is already booked")]
    SeatBooked(u32),

    #[error("Cannot change seats while table is in use")]
    SeatsInUse,
}

/// Seat occupancy state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    Booked,
}

/// Aggregate table occupancy, derived from seat state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableStatus {
    Available,
    #[serde(rename = "Partial Booked")]
    PartialBooked,
    Booked,
}

/// A single bookable seat. Owned by its table, never referenced alone.
///
/// Invariant: `order_id` is `Some` iff `status` is `Booked`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub seat_number: u32,
    pub status: SeatStatus,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl Seat {
    fn available(seat_number: u32) -> Self {
        Self {
            seat_number,
            status: SeatStatus::Available,
            order_id: None,
        }
    }
}

/// Dining table entity (桌台)
///
/// `status` and `current_orders` are derived from `seat_details` by
/// [`DiningTable::refresh`]; the seat status/order pair is the single
/// source of truth for occupancy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: String,
    pub table_no: u32,
    /// Seat count; `seat_details` always holds exactly this many seats
    pub seats: u32,
    pub status: TableStatus,
    pub seat_details: Vec<Seat>,
    /// Orders currently holding at least one seat. Display-only.
    #[serde(default)]
    pub current_orders: Vec<String>,
}

impl DiningTable {
    /// Create a table with `seats` fresh Available seats numbered 1..=seats
    pub fn new(table_no: u32, seats: u32) -> Self {
        let mut table = Self {
            id: Uuid::new_v4().to_string(),
            table_no,
            seats,
            status: TableStatus::Available,
            seat_details: (1..=seats).map(Seat::available).collect(),
            current_orders: Vec::new(),
        };
        table.refresh();
        table
    }

    pub fn seat(&self, seat_number: u32) -> Option<&Seat> {
        self.seat_details
            .iter()
            .find(|s| s.seat_number == seat_number)
    }

    fn seat_mut(&mut self, seat_number: u32) -> Option<&mut Seat> {
        self.seat_details
            .iter_mut()
            .find(|s| s.seat_number == seat_number)
    }

    pub fn booked_seat_count(&self) -> usize {
        self.seat_details
            .iter()
            .filter(|s| s.status == SeatStatus::Booked)
            .count()
    }

    pub fn has_booked_seats(&self) -> bool {
        self.booked_seat_count() > 0
    }

    /// Recompute derived state from seat occupancy.
    ///
    /// Status rule: 0 booked → Available; 0 < booked < total → Partial
    /// Booked; booked == total → Booked. `current_orders` is rebuilt from
    /// seat order references (distinct, in seat order).
    pub fn refresh(&mut self) {
        let booked = self.booked_seat_count();
        self.status = if booked == 0 {
            TableStatus::Available
        } else if booked < self.seat_details.len() {
            TableStatus::PartialBooked
        } else {
            TableStatus::Booked
        };

        self.current_orders.clear();
        for seat in &self.seat_details {
            if let Some(order_id) = &seat.order_id
                && !self.current_orders.contains(order_id)
            {
                self.current_orders.push(order_id.clone());
            }
        }
    }

    /// Book a seat for an order.
    ///
    /// Fails when the seat does not exist or is already booked; never
    /// overwrites an existing booking.
    pub fn book_seat(&mut self, seat_number: u32, order_id: &str) -> Result<(), FloorError> {
        let seat = self
            .seat_mut(seat_number)
            .ok_or(FloorError::SeatNotFound(seat_number))?;
        if seat.status == SeatStatus::Booked {
            return Err(FloorError::SeatBooked(seat_number));
        }
        seat.status = SeatStatus::Booked;
        seat.order_id = Some(order_id.to_string());
        Ok(())
    }

    /// Release a seat held by `order_id`. Returns `true` if the seat changed.
    ///
    /// Idempotent: a seat that is already Available, missing, or held by a
    /// different order is left unchanged.
    pub fn release_seat_of(&mut self, seat_number: u32, order_id: &str) -> bool {
        match self.seat_mut(seat_number) {
            Some(seat)
                if seat.status == SeatStatus::Booked
                    && seat.order_id.as_deref() == Some(order_id) =>
            {
                seat.status = SeatStatus::Available;
                seat.order_id = None;
                true
            }
            _ => false,
        }
    }

    /// Force a seat back to Available regardless of which order holds it.
    ///
    /// Manual seat-status endpoint only; lifecycle paths use
    /// [`DiningTable::release_seat_of`].
    pub fn clear_seat(&mut self, seat_number: u32) {
        if let Some(seat) = self.seat_mut(seat_number) {
            seat.status = SeatStatus::Available;
            seat.order_id = None;
        }
    }

    /// Replace the seat list with a fresh Available set of the new size.
    ///
    /// Fails while any seat is booked.
    pub fn resize(&mut self, seats: u32) -> Result<(), FloorError> {
        if self.has_booked_seats() {
            return Err(FloorError::SeatsInUse);
        }
        self.seats = seats;
        self.seat_details = (1..=seats).map(Seat::available).collect();
        Ok(())
    }
}

// =============================================================================
// API Request Types
// =============================================================================

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub table_no: u32,
    pub seats: u32,
}

/// Update table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
}

/// Seat status update payload (manual override endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatStatusUpdate {
    pub table_id: String,
    pub seat_number: u32,
    pub status: SeatStatus,
    #[serde(default)]
    pub order_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_has_available_seats() {
        let table = DiningTable::new(5, 4);
        assert_eq!(table.seat_details.len(), 4);
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.seat_details.iter().all(|s| {
            s.status == SeatStatus::Available && s.order_id.is_none()
        }));
        assert_eq!(
            table.seat_details.iter().map(|s| s.seat_number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn status_derivation_follows_occupancy() {
        let mut table = DiningTable::new(1, 2);
        table.book_seat(1, "order-a").unwrap();
        table.refresh();
        assert_eq!(table.status, TableStatus::PartialBooked);

        table.book_seat(2, "order-a").unwrap();
        table.refresh();
        assert_eq!(table.status, TableStatus::Booked);

        table.release_seat_of(1, "order-a");
        table.release_seat_of(2, "order-a");
        table.refresh();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[test]
    fn booked_seat_cannot_be_rebooked() {
        let mut table = DiningTable::new(1, 2);
        table.book_seat(1, "order-a").unwrap();
        assert_eq!(
            table.book_seat(1, "order-b"),
            Err(FloorError::SeatBooked(1))
        );
        assert_eq!(table.seat(1).unwrap().order_id.as_deref(), Some("order-a"));
    }

    #[test]
    fn book_unknown_seat_fails() {
        let mut table = DiningTable::new(1, 2);
        assert_eq!(
            table.book_seat(9, "order-a"),
            Err(FloorError::SeatNotFound(9))
        );
    }

    #[test]
    fn release_is_scoped_to_owning_order() {
        let mut table = DiningTable::new(1, 2);
        table.book_seat(1, "order-a").unwrap();

        // another order cannot release the seat
        assert!(!table.release_seat_of(1, "order-b"));
        assert_eq!(table.seat(1).unwrap().status, SeatStatus::Booked);

        assert!(table.release_seat_of(1, "order-a"));
        assert_eq!(table.seat(1).unwrap().status, SeatStatus::Available);
        assert!(table.seat(1).unwrap().order_id.is_none());

        // double release is a no-op
        assert!(!table.release_seat_of(1, "order-a"));
    }

    #[test]
    fn resize_fails_while_seats_booked() {
        let mut table = DiningTable::new(1, 4);
        table.book_seat(1, "order-a").unwrap();
        assert_eq!(table.resize(6), Err(FloorError::SeatsInUse));
        assert_eq!(table.seat_details.len(), 4);
    }

    #[test]
    fn resize_reinitializes_seats() {
        let mut table = DiningTable::new(1, 4);
        table.resize(2).unwrap();
        assert_eq!(table.seats, 2);
        assert_eq!(table.seat_details.len(), 2);
        assert!(table.seat_details.iter().all(|s| s.status == SeatStatus::Available));
    }

    #[test]
    fn current_orders_derived_distinct_in_seat_order() {
        let mut table = DiningTable::new(1, 4);
        table.book_seat(2, "order-b").unwrap();
        table.book_seat(1, "order-a").unwrap();
        table.book_seat(3, "order-a").unwrap();
        table.refresh();
        assert_eq!(table.current_orders, vec!["order-a", "order-b"]);
    }

    #[test]
    fn status_labels_on_the_wire() {
        let mut table = DiningTable::new(7, 2);
        table.book_seat(1, "order-a").unwrap();
        table.refresh();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["status"], "Partial Booked");
        assert_eq!(json["seat_details"][0]["status"], "Booked");
    }
}
