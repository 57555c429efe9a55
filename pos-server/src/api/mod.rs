//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台管理接口
//! - [`orders`] - 订单管理接口
//! - [`menu`] - 菜单管理接口
//! - [`coupons`] - 优惠券管理接口
//! - [`payments`] - 收款记录接口
//! - [`expenses`] - 支出管理接口

pub mod coupons;
pub mod expenses;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

use axum::Router;
use http::HeaderValue;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(tables::router())
        .merge(orders::router())
        .merge(menu::router())
        .merge(coupons::router())
        .merge(payments::router())
        .merge(expenses::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware
pub fn build_app() -> Router<ServerState> {
    let x_request_id = http::HeaderName::from_static("x-request-id");
    build_router()
        // CORS - the dashboard runs on a different origin
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(TraceLayer::new_for_http())
        // Request ID - generated first, propagated to the response
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, XRequestId))
}
