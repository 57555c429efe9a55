//! Expense API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Expense, ExpenseCategory, ExpenseCreate, ExpenseUpdate};
use crate::db::repository::ExpenseRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_message, ok_with_message};

/// Query params for listing expenses
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
}

/// GET /api/expenses - 获取支出 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Expense>>>> {
    let repo = ExpenseRepository::new(state.db.clone());
    let expenses = repo.find_all(query.category).await?;
    Ok(ok(expenses))
}

/// GET /api/expenses/:id - 获取单条支出
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let repo = ExpenseRepository::new(state.db.clone());
    let expense = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {} not found", id)))?;
    Ok(ok(expense))
}

/// POST /api/expenses - 记录支出
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let repo = ExpenseRepository::new(state.db.clone());
    let expense = repo.create(payload).await?;
    Ok(ok_with_message(expense, "Expense created successfully!"))
}

/// PUT /api/expenses/:id - 更新支出
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<AppResponse<Expense>>> {
    let repo = ExpenseRepository::new(state.db.clone());
    let expense = repo.update(&id, payload).await?;
    Ok(ok_with_message(expense, "Expense updated successfully!"))
}

/// DELETE /api/expenses/:id - 软删除支出
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = ExpenseRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(ok_message("Expense deleted successfully!"))
}
