//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_message, ok_with_message};

/// Query params for listing menu items
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<MenuCategory>,
}

/// GET /api/menu - 获取菜单 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<MenuItem>>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_all(query.category).await?;
    Ok(ok(items))
}

/// GET /api/menu/categories - 获取全部分类
pub async fn categories(
    State(_state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<MenuCategory>>>> {
    Ok(ok(MenuCategory::ALL.to_vec()))
}

/// GET /api/menu/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(ok(item))
}

/// POST /api/menu - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    Ok(ok_with_message(item, "Menu item created successfully!"))
}

/// PUT /api/menu/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<AppResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.update(&id, payload).await?;
    Ok(ok_with_message(item, "Menu item updated successfully!"))
}

/// DELETE /api/menu/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(ok_message("Menu item deleted successfully!"))
}
