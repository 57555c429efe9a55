//! OrderManager - order lifecycle and seat booking
//!
//! The only component that moves seats between Available and Booked on
//! behalf of an order. Every operation that touches both an order and a
//! table runs inside exactly one write transaction:
//!
//! ```text
//! operation(...)
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Load + validate (no writes on failure)
//!     ├─ 3. Mutate order and table aggregates through their methods
//!     ├─ 4. Commit (drop aborts)
//!     └─ 5. Return the persisted document
//! ```
//!
//! Seat release fires whenever an order reaches Ready, Completed or
//! Cancelled, or is hard-deleted; the routine is idempotent and only
//! frees seats the order actually holds.

use tracing::{debug, info};

use crate::floor::{
    DiningTable, FloorError, SeatStatus, SeatStatusUpdate, TableCreate, TableStatus, TableUpdate,
};
use crate::orders::error::{OrderError, OrderResult};
use crate::orders::model::{
    BillsOverride, Order, OrderAddItems, OrderCreate, OrderReplaceItems, OrderStatus, OrderType,
    OrderUpdate, SeatRef, TableRef,
};
use crate::orders::money;
use crate::orders::storage::{PosStorage, StorageError};
use redb::WriteTransaction;

/// Order lifecycle manager over the transactional core store
#[derive(Clone)]
pub struct OrderManager {
    storage: PosStorage,
}

impl OrderManager {
    pub fn new(storage: PosStorage) -> Self {
        Self { storage }
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &PosStorage {
        &self.storage
    }

    // ========== Table Operations ==========

    /// Create a table with a fresh set of Available seats
    pub fn create_table(&self, data: TableCreate) -> OrderResult<DiningTable> {
        if data.table_no == 0 {
            return Err(OrderError::Validation("Please provide table No!".into()));
        }
        if data.seats == 0 {
            return Err(OrderError::Validation(
                "Seats count must be positive!".into(),
            ));
        }

        let txn = self.storage.begin_write()?;
        if self.storage.find_table_id_by_no(&txn, data.table_no)?.is_some() {
            return Err(OrderError::Conflict("Table already exist!".into()));
        }

        let mut table = DiningTable::new(data.table_no, data.seats);
        self.storage.put_table(&txn, &mut table)?;
        self.storage.insert_table_no(&txn, data.table_no, &table.id)?;
        txn.commit().map_err(StorageError::from)?;

        info!(table_id = %table.id, table_no = table.table_no, seats = table.seats, "Table created");
        Ok(table)
    }

    /// Update a table's number and/or seat count
    ///
    /// Changing the seat count replaces the seat list with a fresh
    /// Available set; rejected while any seat is booked.
    pub fn update_table(&self, table_id: &str, data: TableUpdate) -> OrderResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or_else(|| OrderError::NotFound("Table not found!".into()))?;

        if let Some(table_no) = data.table_no
            && table_no != table.table_no
        {
            if self.storage.find_table_id_by_no(&txn, table_no)?.is_some() {
                return Err(OrderError::Conflict(
                    "Table number already exists!".into(),
                ));
            }
            self.storage.remove_table_no(&txn, table.table_no)?;
            self.storage.insert_table_no(&txn, table_no, &table.id)?;
            table.table_no = table_no;
        }

        if let Some(seats) = data.seats
            && seats != table.seats
        {
            if seats == 0 {
                return Err(OrderError::Validation(
                    "Seats count must be positive!".into(),
                ));
            }
            table.resize(seats).map_err(|_| {
                OrderError::InvalidState("Cannot change seats while table is in use!".into())
            })?;
        }

        self.storage.put_table(&txn, &mut table)?;
        txn.commit().map_err(StorageError::from)?;

        info!(table_id = %table.id, table_no = table.table_no, "Table updated");
        Ok(table)
    }

    /// Delete a table; only fully Available tables can be removed
    pub fn delete_table(&self, table_id: &str) -> OrderResult<()> {
        let txn = self.storage.begin_write()?;
        let table = self
            .storage
            .get_table_txn(&txn, table_id)?
            .ok_or_else(|| OrderError::NotFound("Table not found!".into()))?;

        if table.status != TableStatus::Available {
            return Err(OrderError::Conflict(
                "Cannot delete a table with booked seats! Please clear the table first.".into(),
            ));
        }

        self.storage.remove_table(&txn, &table)?;
        txn.commit().map_err(StorageError::from)?;

        info!(table_id = %table.id, table_no = table.table_no, "Table deleted");
        Ok(())
    }

    /// Manually override a single seat's status
    ///
    /// Idempotent when the seat is already in the requested state (for a
    /// booking, only when it is held by the same order); booking a seat
    /// held by a different order fails with a conflict.
    pub fn set_seat_status(&self, update: SeatStatusUpdate) -> OrderResult<DiningTable> {
        let txn = self.storage.begin_write()?;
        let mut table = self
            .storage
            .get_table_txn(&txn, &update.table_id)?
            .ok_or_else(|| OrderError::NotFound("Table not found!".into()))?;

        let seat = table
            .seat(update.seat_number)
            .ok_or_else(|| OrderError::NotFound("Seat not found!".into()))?;
        let current_status = seat.status;
        let current_order = seat.order_id.clone();

        match update.status {
            SeatStatus::Booked => {
                if current_status == SeatStatus::Booked {
                    if current_order == update.order_id {
                        // already in the requested state
                        return Ok(table);
                    }
                    return Err(OrderError::Conflict(
                        "This seat is already booked.".into(),
                    ));
                }
                let order_id = update.order_id.ok_or_else(|| {
                    OrderError::Validation("An order id is required to book a seat.".into())
                })?;
                table
                    .book_seat(update.seat_number, &order_id)
                    .map_err(|e| self.map_floor_error(e, table.table_no))?;
            }
            SeatStatus::Available => {
                if current_status == SeatStatus::Available {
                    return Ok(table);
                }
                table.clear_seat(update.seat_number);
            }
        }

        self.storage.put_table(&txn, &mut table)?;
        txn.commit().map_err(StorageError::from)?;

        info!(
            table_id = %table.id,
            seat_number = update.seat_number,
            status = ?update.status,
            "Seat status updated"
        );
        Ok(table)
    }

    /// Get a table by id (read-only)
    pub fn get_table(&self, table_id: &str) -> OrderResult<DiningTable> {
        self.storage
            .get_table(table_id)?
            .ok_or_else(|| OrderError::NotFound("Table not found!".into()))
    }

    /// List all tables (read-only)
    pub fn list_tables(&self) -> OrderResult<Vec<DiningTable>> {
        Ok(self.storage.list_tables()?)
    }

    // ========== Order Lifecycle ==========

    /// Create an order, booking every requested seat atomically
    ///
    /// Either all requested seats become Booked and the order is
    /// persisted, or nothing changes.
    pub fn create_order(&self, payload: OrderCreate) -> OrderResult<Order> {
        if payload.customer_details.serial_number.trim().is_empty() {
            return Err(OrderError::Validation("Serial number is required!".into()));
        }
        let order_type = payload.order_type.unwrap_or(OrderType::DineIn);
        if order_type == OrderType::DineIn && payload.seats.is_empty() {
            return Err(OrderError::Validation(
                "Seats are required for Dine In orders.".into(),
            ));
        }

        let txn = self.storage.begin_write()?;

        // Availability is checked for the whole seat set before any write.
        let table_snapshot = match order_type {
            OrderType::DineIn => Some(self.validate_seats(&txn, &payload.seats)?),
            OrderType::TakeAway => None,
        };

        let order = Order::from_create(payload, table_snapshot);
        self.storage.put_order(&txn, &order)?;

        for seat_ref in &order.seats {
            self.book_seat(&txn, seat_ref, &order.id)?;
        }

        txn.commit().map_err(StorageError::from)?;

        info!(
            order_id = %order.id,
            order_type = ?order.order_type,
            seats = order.seats.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Apply field updates to an order
    ///
    /// When the resulting status is Ready, Completed or Cancelled the
    /// pre-update seat set is released in the same transaction.
    pub fn update_order(&self, order_id: &str, update: OrderUpdate) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let existing = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        let mut order = existing.clone();
        if let Some(status) = update.order_status {
            order.order_status = status;
        }
        if let Some(is_paid) = update.is_paid {
            order.is_paid = is_paid;
        }
        if let Some(method) = update.payment_method {
            order.payment_method = Some(method);
        }
        if let Some(items) = update.items {
            order.items = items;
        }
        if let Some(details) = update.customer_details {
            order.customer_details = details;
        }
        order.updated_at = chrono::Utc::now();
        self.storage.put_order(&txn, &order)?;

        if let Some(status) = update.order_status
            && status.releases_seats()
        {
            self.release_seats(&txn, &existing)?;
        }

        txn.commit().map_err(StorageError::from)?;

        info!(order_id = %order.id, status = ?order.order_status, "Order updated");
        Ok(order)
    }

    /// Cancel an order and release its seats in one transaction
    ///
    /// Succeeds even when the seats were already released (for example
    /// after completion); the release is then a no-op.
    pub fn cancel_order(&self, order_id: &str) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        order.order_status = OrderStatus::Cancelled;
        order.updated_at = chrono::Utc::now();
        self.storage.put_order(&txn, &order)?;
        self.release_seats(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        info!(order_id = %order.id, "Order cancelled");
        Ok(order)
    }

    /// Release an order's seats and remove the document, one transaction
    pub fn delete_order(&self, order_id: &str) -> OrderResult<()> {
        let txn = self.storage.begin_write()?;
        let order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        self.release_seats(&txn, &order)?;
        self.storage.remove_order(&txn, order_id)?;
        txn.commit().map_err(StorageError::from)?;

        info!(order_id = %order_id, "Order deleted");
        Ok(())
    }

    /// Append items to an order and recompute its bill
    pub fn add_items(&self, order_id: &str, payload: OrderAddItems) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        if order.is_paid {
            return Err(OrderError::Conflict(
                "Cannot add items to a paid order.".into(),
            ));
        }

        if let Some(order_type) = payload.order_type {
            if order_type == OrderType::DineIn
                && payload.table.is_none()
                && order.table.is_none()
            {
                return Err(OrderError::InvalidState(
                    "Table is required for Dine In orders.".into(),
                ));
            }
            order.order_type = order_type;
        }
        if let Some(table) = payload.table {
            order.table = Some(table);
        }

        order.items.extend(payload.items);
        apply_bills(&mut order, payload.bills);
        order.updated_at = chrono::Utc::now();
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        debug!(order_id = %order.id, total = order.bills.total, "Items added to order");
        Ok(order)
    }

    /// Replace an order's items wholesale; optionally rebind its seats
    ///
    /// A supplied seat set goes through the same availability checks as
    /// order creation: the old seats are released and the new ones booked
    /// inside one transaction, so a conflicting seat aborts the whole
    /// replacement.
    pub fn replace_items(&self, order_id: &str, payload: OrderReplaceItems) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        if order.is_paid {
            return Err(OrderError::Conflict(
                "Cannot add items to a paid order.".into(),
            ));
        }

        let prior = order.clone();
        let table_supplied = payload.table.is_some();

        if let Some(order_type) = payload.order_type {
            order.order_type = order_type;
        }

        if order.order_type == OrderType::DineIn
            && payload.table.is_none()
            && payload.seats.as_ref().is_none_or(|s| s.is_empty())
        {
            return Err(OrderError::InvalidState(
                "Table and seats are required for Dine In orders.".into(),
            ));
        }

        if let Some(table) = payload.table {
            order.table = Some(table);
        }
        if let Some(details) = payload.customer_details {
            order.customer_details = details;
        }

        match order.order_type {
            OrderType::TakeAway => {
                // leaving Dine In frees whatever the order still holds
                self.release_seats(&txn, &prior)?;
                order.seats = Vec::new();
                order.table = None;
            }
            OrderType::DineIn => {
                if let Some(new_seats) = payload.seats
                    && new_seats != order.seats
                {
                    self.release_seats(&txn, &prior)?;
                    let snapshot = self.validate_seats(&txn, &new_seats)?;
                    for seat_ref in &new_seats {
                        self.book_seat(&txn, seat_ref, &order.id)?;
                    }
                    if !table_supplied {
                        order.table = Some(snapshot);
                    }
                    order.seats = new_seats;
                }
            }
        }

        order.items = payload.items;
        apply_bills(&mut order, payload.bills);
        order.updated_at = chrono::Utc::now();
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        info!(order_id = %order.id, seats = order.seats.len(), "Order items replaced");
        Ok(order)
    }

    /// Mark an order as paid with the given payment method
    pub fn record_payment(&self, order_id: &str, method: &str) -> OrderResult<Order> {
        let txn = self.storage.begin_write()?;
        let mut order = self
            .storage
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))?;

        order.is_paid = true;
        order.payment_method = Some(method.to_string());
        order.updated_at = chrono::Utc::now();
        self.storage.put_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;

        info!(order_id = %order.id, method = %method, "Payment recorded");
        Ok(order)
    }

    /// Get an order by id (read-only)
    pub fn get_order(&self, order_id: &str) -> OrderResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or_else(|| OrderError::NotFound("Order not found!".into()))
    }

    /// List all orders, newest first (read-only)
    pub fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.storage.list_orders()?)
    }

    // ========== Seat Booking Internals ==========

    /// Check every referenced seat exists and is Available
    ///
    /// Returns a snapshot of the first seat's table. Performs no writes.
    fn validate_seats(
        &self,
        txn: &WriteTransaction,
        seats: &[SeatRef],
    ) -> OrderResult<TableRef> {
        let mut snapshot: Option<TableRef> = None;
        for seat_ref in seats {
            let table = self
                .storage
                .get_table_txn(txn, &seat_ref.table_id)?
                .ok_or_else(|| {
                    OrderError::NotFound(format!(
                        "Table with id {} not found.",
                        seat_ref.table_id
                    ))
                })?;
            let seat = table.seat(seat_ref.seat_number).ok_or_else(|| {
                OrderError::NotFound(format!(
                    "Seat number {} not found on table {}.",
                    seat_ref.seat_number, table.table_no
                ))
            })?;
            if seat.status != SeatStatus::Available {
                return Err(OrderError::Conflict(format!(
                    "Seat {} on table {} is already booked.",
                    seat_ref.seat_number, table.table_no
                )));
            }
            if snapshot.is_none() {
                snapshot = Some(TableRef {
                    id: table.id.clone(),
                    table_no: table.table_no,
                });
            }
        }
        snapshot.ok_or_else(|| {
            OrderError::Validation("Seats are required for Dine In orders.".into())
        })
    }

    /// Book one seat for an order and persist its table
    fn book_seat(
        &self,
        txn: &WriteTransaction,
        seat_ref: &SeatRef,
        order_id: &str,
    ) -> OrderResult<()> {
        let mut table = self
            .storage
            .get_table_txn(txn, &seat_ref.table_id)?
            .ok_or_else(|| {
                OrderError::NotFound(format!("Table with id {} not found.", seat_ref.table_id))
            })?;
        table
            .book_seat(seat_ref.seat_number, order_id)
            .map_err(|e| self.map_floor_error(e, table.table_no))?;
        self.storage.put_table(txn, &mut table)?;
        Ok(())
    }

    /// Seat release routine: free every seat held by the order
    ///
    /// Dine In with a non-empty seat list only; Take Away orders are a
    /// no-op. Seats already Available, or held by a different order, are
    /// left untouched, so a double release is harmless.
    fn release_seats(&self, txn: &WriteTransaction, order: &Order) -> OrderResult<()> {
        if order.order_type != OrderType::DineIn || order.seats.is_empty() {
            return Ok(());
        }
        for seat_ref in &order.seats {
            let Some(mut table) = self.storage.get_table_txn(txn, &seat_ref.table_id)? else {
                // table removed since booking; nothing left to free
                continue;
            };
            if table.release_seat_of(seat_ref.seat_number, &order.id) {
                self.storage.put_table(txn, &mut table)?;
                debug!(
                    order_id = %order.id,
                    table_no = table.table_no,
                    seat_number = seat_ref.seat_number,
                    "Seat released"
                );
            }
        }
        Ok(())
    }

    fn map_floor_error(&self, err: FloorError, table_no: u32) -> OrderError {
        match err {
            FloorError::SeatNotFound(n) => OrderError::NotFound(format!(
                "Seat number {} not found on table {}.",
                n, table_no
            )),
            FloorError::SeatBooked(n) => OrderError::Conflict(format!(
                "Seat {} on table {} is already booked.",
                n, table_no
            )),
            FloorError::SeatsInUse => {
                OrderError::InvalidState("Cannot change seats while table is in use!".into())
            }
        }
    }
}

/// Recompute the bill from the item list, then apply any override.
///
/// Without an explicit total-with-discount the stored discount (or the
/// override's) is applied to the fresh subtotal, so the two totals can
/// never drift apart.
fn apply_bills(order: &mut Order, bills: Option<BillsOverride>) {
    let subtotal = money::items_subtotal(&order.items);
    order.bills.total = subtotal;
    match bills {
        Some(override_) => {
            order.bills.discount = override_.discount;
            order.bills.total_with_discount = override_
                .total_with_discount
                .unwrap_or_else(|| money::discounted_total(subtotal, order.bills.discount.as_ref()));
        }
        None => {
            order.bills.total_with_discount =
                money::discounted_total(subtotal, order.bills.discount.as_ref());
        }
    }
}
