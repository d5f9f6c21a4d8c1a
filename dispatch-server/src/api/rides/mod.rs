//! Ride API Module
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/rides/request | POST | 乘客发起行程 |
//! | /api/rides/available | GET | 待接单行程 (司机端) |
//! | /api/rides/quote | GET | 预估车费 |
//! | /api/rides/{id} | GET | 行程详情 |
//! | /api/rides/{id}/accept | PUT | 司机接单 |
//! | /api/rides/{id}/status | PUT | 开始 / 完成 |
//! | /api/rides/{id}/cancel | PUT | 乘客取消 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Ride router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/rides", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/request", post(handler::request_ride))
        .route("/available", get(handler::list_available))
        .route("/quote", get(handler::quote))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/accept", put(handler::accept))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/cancel", put(handler::cancel))
}
