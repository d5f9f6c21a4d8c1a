//! 工具模块 - 日志与输入校验
//!
//! 错误类型统一来自 `shared::error`，这里只做 re-export。

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
