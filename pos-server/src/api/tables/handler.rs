//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::floor::{DiningTable, SeatStatusUpdate, TableCreate, TableUpdate};
use crate::utils::{AppResponse, AppResult, ok, ok_message, ok_with_message};

/// GET /api/tables - 获取所有桌台
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<DiningTable>>>> {
    let tables = state.orders.list_tables()?;
    Ok(ok(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table = state.orders.get_table(&id)?;
    Ok(ok(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table = state.orders.create_table(payload)?;
    Ok(ok_with_message(table, "Table added!"))
}

/// PUT /api/tables/:id - 更新桌台 (编号/座位数)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table = state.orders.update_table(&id, payload)?;
    Ok(ok_with_message(table, "Table updated!"))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    state.orders.delete_table(&id)?;
    Ok(ok_message("Table deleted successfully!"))
}

/// PUT /api/tables/seat-status - 手动调整座位状态
pub async fn set_seat_status(
    State(state): State<ServerState>,
    Json(payload): Json<SeatStatusUpdate>,
) -> AppResult<Json<AppResponse<DiningTable>>> {
    let table = state.orders.set_seat_status(payload)?;
    Ok(ok_with_message(table, "Seat status updated!"))
}
