//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::orders::{Order, OrderAddItems, OrderCreate, OrderReplaceItems, OrderUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_message, ok_with_message};

/// GET /api/orders - 获取所有订单
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.list_orders()?;
    Ok(ok(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.get_order(&id)?;
    Ok(ok(order))
}

/// POST /api/orders - 创建订单 (Dine In 同时预订座位)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.create_order(payload)?;
    Ok(ok_with_message(order, "Order created!"))
}

/// PUT /api/orders/:id - 更新订单 (状态/字段)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.update_order(&id, payload)?;
    Ok(ok_with_message(order, "Order updated"))
}

/// PATCH /api/orders/:id - 整单替换菜品 (可换座)
pub async fn replace_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderReplaceItems>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.replace_items(&id, payload)?;
    Ok(ok_with_message(order, "Order updated successfully"))
}

/// PUT /api/orders/:id/items - 追加菜品
pub async fn add_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderAddItems>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.add_items(&id, payload)?;
    Ok(ok_with_message(order, "Items added to order successfully"))
}

/// DELETE /api/orders/:id/cancel - 取消订单并释放座位
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.cancel_order(&id)?;
    Ok(ok_with_message(order, "Order cancelled successfully!"))
}

/// DELETE /api/orders/:id - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.orders.delete_order(&id)?;
    Ok(ok_message("Order deleted successfully!"))
}
