//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 + 各状态行程数 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "uptime_seconds": 42,
//!   "storage": "memory",
//!   "subscribers": 3,
//!   "rides": { "requested": 2, "accepted": 1, "started": 0, "completed": 5, "cancelled": 0 }
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::ServerState;
use crate::core::config::StorageBackend;

/// 健康检查路由 - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 存储后端
    storage: &'static str,
    /// 当前实时订阅数
    subscribers: usize,
    /// 各状态行程数
    rides: BTreeMap<&'static str, usize>,
}

/// 基础健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let rides = state
        .engine
        .store()
        .count_by_status()
        .into_iter()
        .map(|(status, count)| (status.as_str(), count))
        .collect();

    let uptime_seconds = (chrono::Utc::now() - state.started_at)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        storage: match state.config.storage_backend {
            StorageBackend::Memory => "memory",
            StorageBackend::Redb => "redb",
        },
        subscribers: state.hub.subscriber_count(),
        rides,
    })
}
