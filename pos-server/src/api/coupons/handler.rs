//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Coupon, CouponApplied, CouponApply, CouponCreate, CouponUpdate};
use crate::db::repository::CouponRepository;
use crate::utils::{AppResponse, AppResult, ok, ok_message, ok_with_message};

/// GET /api/coupons - 获取所有优惠券
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Coupon>>>> {
    let repo = CouponRepository::new(state.db.clone());
    let coupons = repo.find_all().await?;
    Ok(ok(coupons))
}

/// POST /api/coupons - 创建优惠券
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let repo = CouponRepository::new(state.db.clone());
    let coupon = repo.create(payload).await?;
    Ok(ok_with_message(coupon, "Coupon created successfully!"))
}

/// PUT /api/coupons/:id - 更新优惠券
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<AppResponse<Coupon>>> {
    let repo = CouponRepository::new(state.db.clone());
    let coupon = repo.update(&id, payload).await?;
    Ok(ok_with_message(coupon, "Coupon updated successfully!"))
}

/// DELETE /api/coupons/:id - 删除优惠券
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = CouponRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(ok_message("Coupon deleted successfully!"))
}

/// POST /api/coupons/apply - 按账单总额试算折扣
pub async fn apply(
    State(state): State<ServerState>,
    Json(payload): Json<CouponApply>,
) -> AppResult<Json<AppResponse<CouponApplied>>> {
    let repo = CouponRepository::new(state.db.clone());
    let applied = repo.apply(&payload.code, payload.total_amount).await?;
    Ok(ok_with_message(applied, "Coupon applied successfully!"))
}
