use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::config::StorageBackend;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result};
use crate::fare::FareCalculator;
use crate::notify::NotificationHub;
use crate::rides::{DispatchEngine, RedbRideRepository, RideStore, expiry};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，clone 成本极低，可直接作为 axum State。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | engine | Arc<DispatchEngine> | 调度核心 |
/// | hub | NotificationHub | 实时推送订阅表 (与 engine 共享) |
/// | started_at | DateTime<Utc> | 启动时间 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub engine: Arc<DispatchEngine>,
    pub hub: NotificationHub,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    /// 用已有的 store 构造 (测试 / 嵌入场景)
    pub fn with_store(config: Config, store: Arc<RideStore>) -> Self {
        let hub = NotificationHub::new(config.notify_channel_capacity);
        let fares = FareCalculator::new(config.fare_table);
        let engine = Arc::new(DispatchEngine::new(store, fares, hub.clone()));
        Self {
            config,
            engine,
            hub,
            started_at: Utc::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 行程存储 (memory 或 redb，redb 会从磁盘预热)
    /// 3. 调度核心与推送 hub
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let store = match config.storage_backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory ride storage");
                RideStore::new()
            }
            StorageBackend::Redb => {
                let path = config.database_path();
                tracing::info!(path = %path.display(), "Opening redb ride storage");
                let repository = RedbRideRepository::open(&path)?;
                let store = RideStore::with_repository(Arc::new(repository));
                store.warm_up()?;
                store
            }
        };

        Ok(Self::with_store(config.clone(), Arc::new(store)))
    }

    /// 注册后台任务
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        expiry::register(
            &mut tasks,
            self.engine.clone(),
            self.config.ride_request_ttl(),
            self.config.expiry_sweep_interval(),
        );
        tasks.log_summary();
        tasks
    }
}
