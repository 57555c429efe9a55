//! 座位一致性集成测试
//!
//! 并发抢座场景：同一座位的并发预订最多只能有一个成功，
//! 其余必须观察到座位已被占用并收到冲突错误。

use std::sync::{Arc, Barrier};
use std::thread;

use rand::Rng;
use pos_server::floor::{SeatStatus, TableCreate, TableStatus, TableUpdate};
use pos_server::orders::{
    Bills, CustomerDetails, Order, OrderCreate, OrderError, OrderItem, OrderManager, OrderStatus,
    OrderType, OrderUpdate, PosStorage, SeatRef,
};

fn manager() -> OrderManager {
    OrderManager::new(PosStorage::open_in_memory().unwrap())
}

fn order_payload(serial: &str, seats: Vec<SeatRef>) -> OrderCreate {
    OrderCreate {
        customer_details: CustomerDetails {
            serial_number: serial.to_string(),
            guests: Some(seats.len() as u32),
        },
        order_status: Some(OrderStatus::InProgress),
        order_type: Some(OrderType::DineIn),
        items: vec![OrderItem {
            name: "Kacchi Biriyani".into(),
            price: 320.0,
            quantity: 1,
        }],
        bills: Bills {
            total: 320.0,
            discount: None,
            total_with_discount: 320.0,
        },
        seats,
    }
}

#[test]
fn concurrent_booking_of_one_seat_admits_exactly_one_winner() {
    const CONTENDERS: usize = 8;

    let mgr = manager();
    let table = mgr
        .create_table(TableCreate { table_no: 5, seats: 4 })
        .unwrap();

    let barrier = Arc::new(Barrier::new(CONTENDERS));
    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let mgr = mgr.clone();
            let barrier = barrier.clone();
            let table_id = table.id.clone();
            thread::spawn(move || {
                barrier.wait();
                mgr.create_order(order_payload(
                    &format!("S-{i}"),
                    vec![SeatRef {
                        table_id,
                        seat_number: 1,
                    }],
                ))
            })
        })
        .collect();

    let results: Vec<Result<Order, OrderError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners: Vec<&Order> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one booking may win");
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, OrderError::Conflict(_)), "losers must see Conflict, got {err:?}");
        }
    }

    // the seat ends up bound to exactly the winning order
    let table = mgr.get_table(&table.id).unwrap();
    assert_eq!(table.booked_seat_count(), 1);
    assert_eq!(
        table.seat(1).unwrap().order_id.as_deref(),
        Some(winners[0].id.as_str())
    );
    assert_eq!(table.status, TableStatus::PartialBooked);
    assert_eq!(mgr.list_orders().unwrap().len(), 1);
}

#[test]
fn concurrent_random_bookings_never_double_bind_a_seat() {
    const CONTENDERS: usize = 16;

    let mgr = manager();
    let table = mgr
        .create_table(TableCreate { table_no: 9, seats: 4 })
        .unwrap();

    let barrier = Arc::new(Barrier::new(CONTENDERS));
    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let mgr = mgr.clone();
            let barrier = barrier.clone();
            let table_id = table.id.clone();
            thread::spawn(move || {
                let seat_number = rand::thread_rng().gen_range(1..=4);
                barrier.wait();
                mgr.create_order(order_payload(
                    &format!("S-{i}"),
                    vec![SeatRef {
                        table_id,
                        seat_number,
                    }],
                ))
            })
        })
        .collect();

    let results: Vec<Result<Order, OrderError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners: Vec<&Order> = results.iter().filter_map(|r| r.as_ref().ok()).collect();

    let table = mgr.get_table(&table.id).unwrap();
    assert_eq!(table.booked_seat_count(), winners.len());

    // each booked seat is bound to the one order that won it
    for order in &winners {
        let seat_number = order.seats[0].seat_number;
        assert_eq!(
            table.seat(seat_number).unwrap().order_id.as_deref(),
            Some(order.id.as_str())
        );
    }

    // seat/order invariant: order_id is Some iff the seat is Booked
    for seat in &table.seat_details {
        assert_eq!(seat.status == SeatStatus::Booked, seat.order_id.is_some());
    }
}

#[test]
fn table_lifecycle_walkthrough() {
    let mgr = manager();

    // table 5 with 4 seats starts fully available
    let table = mgr
        .create_table(TableCreate { table_no: 5, seats: 4 })
        .unwrap();
    assert_eq!(table.status, TableStatus::Available);

    // dine-in order books seats 1 and 2
    let order = mgr
        .create_order(order_payload(
            "S-100",
            vec![
                SeatRef { table_id: table.id.clone(), seat_number: 1 },
                SeatRef { table_id: table.id.clone(), seat_number: 2 },
            ],
        ))
        .unwrap();
    assert_eq!(
        mgr.get_table(&table.id).unwrap().status,
        TableStatus::PartialBooked
    );

    // a second order wanting seat 1 bounces off
    let err = mgr
        .create_order(order_payload(
            "S-101",
            vec![SeatRef { table_id: table.id.clone(), seat_number: 1 }],
        ))
        .unwrap_err();
    assert!(matches!(err, OrderError::Conflict(_)));
    assert_eq!(mgr.get_table(&table.id).unwrap().booked_seat_count(), 2);

    // resizing while booked is refused
    let err = mgr
        .update_table(&table.id, TableUpdate { table_no: None, seats: Some(6) })
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidState(_)));

    // completing the order frees both seats
    mgr.update_order(
        &order.id,
        OrderUpdate {
            order_status: Some(OrderStatus::Completed),
            ..Default::default()
        },
    )
    .unwrap();
    let freed = mgr.get_table(&table.id).unwrap();
    assert_eq!(freed.status, TableStatus::Available);
    assert_eq!(freed.booked_seat_count(), 0);

    // cancelling afterwards succeeds without touching any seat
    let cancelled = mgr.cancel_order(&order.id).unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
    assert_eq!(mgr.get_table(&table.id).unwrap().booked_seat_count(), 0);

    // now the resize goes through, and so does deletion
    mgr.update_table(&table.id, TableUpdate { table_no: None, seats: Some(6) })
        .unwrap();
    mgr.delete_table(&table.id).unwrap();
    assert!(mgr.list_tables().unwrap().is_empty());
}

#[test]
fn bookings_survive_storage_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor.redb");

    let table_id;
    let order_id;
    {
        let mgr = OrderManager::new(PosStorage::open(&path).unwrap());
        let table = mgr
            .create_table(TableCreate { table_no: 3, seats: 2 })
            .unwrap();
        let order = mgr
            .create_order(order_payload(
                "S-1",
                vec![SeatRef { table_id: table.id.clone(), seat_number: 2 }],
            ))
            .unwrap();
        table_id = table.id;
        order_id = order.id;
    }

    let mgr = OrderManager::new(PosStorage::open(&path).unwrap());
    let table = mgr.get_table(&table_id).unwrap();
    assert_eq!(table.status, TableStatus::PartialBooked);
    assert_eq!(table.seat(2).unwrap().order_id.as_deref(), Some(order_id.as_str()));
    assert_eq!(mgr.get_order(&order_id).unwrap().seats.len(), 1);
}
