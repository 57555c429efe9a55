//! Payment API Handlers
//!
//! 现金收款：先通过 OrderManager 标记订单已支付，再落一条收款记录。

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{Payment, PaymentCreate};
use crate::db::repository::PaymentRepository;
use crate::orders::Order;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

/// GET /api/payments - 获取收款记录
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Payment>>>> {
    let repo = PaymentRepository::new(state.db.clone());
    let payments = repo.find_all().await?;
    Ok(ok(payments))
}

/// POST /api/payments/process - 现金收款
pub async fn process(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    // Mark the order paid first; a bad order id fails before any record
    // is written.
    let order = state.orders.record_payment(&payload.order_id, "Cash")?;

    let repo = PaymentRepository::new(state.db.clone());
    repo.create(payload).await?;

    Ok(ok_with_message(
        order,
        "Cash payment processed successfully!",
    ))
}
