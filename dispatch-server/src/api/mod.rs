//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`rides`] - 行程请求 / 接单 / 状态流转
//! - [`admin`] - 行程总览

pub mod admin;
pub mod health;
pub mod rides;

use axum::Router;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use http::HeaderValue;
use socketioxide::layer::SocketIoLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(rides::router())
        .merge(admin::router())
}

/// Build the fully configured application with middleware and state
///
/// Used by in-process tests; the server adds the socket.io layer through
/// [`build_realtime_app`].
pub fn build_app(state: ServerState) -> Router {
    let router = with_middleware(build_router(), &state.config);
    router.with_state(state)
}

/// Same as [`build_app`] with socket.io mounted on the same port
pub fn build_realtime_app(state: ServerState, socket_io: SocketIoLayer) -> Router {
    let router = with_middleware(build_router().layer(socket_io), &state.config);
    router.with_state(state)
}

fn with_middleware(router: Router<ServerState>, config: &Config) -> Router<ServerState> {
    router
        // CORS - browser clients on another origin
        .layer(cors_layer(config))
        // Trace - request tracing
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) if config.cors_origin != "*" => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::permissive(),
    }
}

/// Unwrap a JSON body, turning axum's rejection into a 400 `AppError`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// Unwrap query params, turning axum's rejection into a 400 `AppError`
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}
