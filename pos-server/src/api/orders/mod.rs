//! Order API 模块
//!
//! All mutations go through the OrderManager so seat state stays
//! consistent with order lifecycle.

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::replace_items)
                .delete(handler::delete),
        )
        .route("/{id}/items", put(handler::add_items))
        .route("/{id}/cancel", delete(handler::cancel))
}
