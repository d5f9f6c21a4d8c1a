use rust_decimal::Decimal;
use shared::ride::VehicleClass;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::fare::{FareRate, FareTable};

/// 行程存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// 仅内存，进程退出即丢失
    #[default]
    Memory,
    /// redb 文件 (`{WORK_DIR}/rides.redb`)
    Redb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "redb" | "disk" => Ok(Self::Redb),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// 服务器配置 - 调度服务的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP + socket.io 端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 / EnvFilter |
/// | LOG_DIR | (未设置) | 设置后按天滚动写文件 |
/// | STORAGE_BACKEND | memory | memory / redb |
/// | NOTIFY_CHANNEL_CAPACITY | 64 | 每个订阅的缓冲事件数 |
/// | RIDE_REQUEST_TTL_SECS | 0 | 未接单自动取消 (0 = 关闭) |
/// | EXPIRY_SWEEP_INTERVAL_SECS | 30 | 过期扫描周期 |
/// | FARE_{ECONOMY,AUTO,PREMIUM}_{BASE,PER_KM} | 20/10, 30/15, 50/25 | 计价表 |
/// | CORS_ORIGIN | http://localhost:5173 | 允许的前端来源 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// STORAGE_BACKEND=redb RIDE_REQUEST_TTL_SECS=300 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub storage_backend: StorageBackend,
    pub notify_channel_capacity: usize,
    /// 0 = 不过期
    pub ride_request_ttl_secs: u64,
    pub expiry_sweep_interval_secs: u64,
    pub fare_table: FareTable,
    pub cors_origin: String,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key → value 来源加载配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = FareTable::default();

        let mut fare_table = defaults;
        for class in VehicleClass::ALL {
            let prefix = format!("FARE_{}", class.as_str().to_ascii_uppercase());
            let default = defaults.rate_for(class);
            let base = parse_var(&lookup, &format!("{prefix}_BASE")).unwrap_or(default.base);
            let per_km = lookup(&format!("{prefix}_PER_KM"))
                .and_then(|v| Decimal::from_str(v.trim()).ok())
                .filter(|d| !d.is_sign_negative())
                .unwrap_or(default.per_km);
            fare_table.set_rate(class, FareRate::new(base, per_km));
        }

        Self {
            work_dir: lookup("WORK_DIR").unwrap_or_else(|| "./data".into()),
            http_port: parse_var(&lookup, "HTTP_PORT").unwrap_or(5000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
            storage_backend: parse_var(&lookup, "STORAGE_BACKEND").unwrap_or_default(),
            notify_channel_capacity: parse_var(&lookup, "NOTIFY_CHANNEL_CAPACITY")
                .filter(|c: &usize| *c > 0)
                .unwrap_or(64),
            ride_request_ttl_secs: parse_var(&lookup, "RIDE_REQUEST_TTL_SECS").unwrap_or(0),
            expiry_sweep_interval_secs: parse_var(&lookup, "EXPIRY_SWEEP_INTERVAL_SECS")
                .filter(|s: &u64| *s > 0)
                .unwrap_or(30),
            fare_table,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".into()),
            shutdown_timeout_ms: parse_var(&lookup, "SHUTDOWN_TIMEOUT_MS").unwrap_or(10000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// redb 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("rides.redb")
    }

    pub fn ride_request_ttl(&self) -> Duration {
        Duration::from_secs(self.ride_request_ttl_secs)
    }

    pub fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.work_dir, "./data");
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.notify_channel_capacity, 64);
        assert!(config.ride_request_ttl().is_zero());
        assert_eq!(config.expiry_sweep_interval(), Duration::from_secs(30));
        assert_eq!(config.fare_table, FareTable::default());
        assert!(config.log_dir.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HTTP_PORT", "8080"),
            ("STORAGE_BACKEND", "redb"),
            ("RIDE_REQUEST_TTL_SECS", "300"),
            ("FARE_AUTO_BASE", "40"),
            ("FARE_AUTO_PER_KM", "12.5"),
            ("ENVIRONMENT", "production"),
            ("WORK_DIR", "/tmp/rides"),
        ]);
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.storage_backend, StorageBackend::Redb);
        assert_eq!(config.ride_request_ttl(), Duration::from_secs(300));
        let auto = config.fare_table.rate_for(VehicleClass::Auto);
        assert_eq!(auto.base, 40);
        assert_eq!(auto.per_km, Decimal::new(125, 1));
        assert_eq!(config.fare_table.economy, FareTable::default().economy);
        assert!(config.is_production());
        assert_eq!(config.database_path(), PathBuf::from("/tmp/rides/rides.redb"));
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let config = config_from(&[
            ("HTTP_PORT", "not-a-port"),
            ("STORAGE_BACKEND", "cassandra"),
            ("NOTIFY_CHANNEL_CAPACITY", "0"),
            ("FARE_PREMIUM_PER_KM", "-3"),
            ("LOG_DIR", "  "),
        ]);
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.notify_channel_capacity, 64);
        assert_eq!(config.fare_table.premium, FareTable::default().premium);
        assert!(config.log_dir.is_none());
    }
}
