//! Dispatch Server - 网约车调度核心
//!
//! # 架构概述
//!
//! - **计价** (`fare`): 按车型的基础价 + 里程价，创建时一次性计算
//! - **行程** (`rides`): 状态机、按行程加锁的 RideStore、redb 持久化、DispatchEngine
//! - **推送** (`notify`): 订阅表 + 扇出，最多一次投递
//! - **实时** (`realtime`): socket.io 桥接
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! dispatch-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── fare/          # FareCalculator
//! ├── rides/         # 状态机、存储、调度
//! ├── notify/        # NotificationHub
//! ├── realtime/      # socket.io
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod fare;
pub mod notify;
pub mod realtime;
pub mod rides;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use fare::FareCalculator;
pub use notify::NotificationHub;
pub use rides::{DispatchEngine, DispatchError, RideStore};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并读取配置、初始化日志
pub fn setup_environment() -> Config {
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____  _                  __       __
   / __ \(_)________  ____ _/ /______/ /_
  / / / / / ___/ __ \/ __ `/ __/ ___/ __ \
 / /_/ / (__  ) /_/ / /_/ / /_/ /__/ / / /
/_____/_/____/ .___/\__,_/\__/\___/_/ /_/
            /_/
    "#
    );
}
