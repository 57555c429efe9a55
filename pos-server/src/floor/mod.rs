//! 桌台模块 - Table/Seat aggregate
//!
//! A dining table owns its seats as one consistency boundary. The aggregate
//! derives table status from seat occupancy and is the only place seat
//! state transitions are expressed; callers persist through
//! [`crate::orders::PosStorage`], which refreshes derived state on every write.

mod model;

pub use model::{
    DiningTable, FloorError, Seat, SeatStatus, SeatStatusUpdate, TableCreate, TableStatus,
    TableUpdate,
};
