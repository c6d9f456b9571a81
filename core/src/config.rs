//! 连接配置

use crate::error::{DatabaseError, Result};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TABLE_PREFIX: &str = "sfw2";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// 数据库连接配置
///
/// 可以从 TOML/JSON 等格式反序列化，也可以通过 [`DatabaseConfig::from_env`] 从环境变量读取。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库 URL（mysql://、postgres://、sqlite:）
    pub url: String,
    /// `{TABLE_PREFIX}` 的替换值
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_table_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            table_prefix: default_table_prefix(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// 从环境变量读取配置
    ///
    /// * `DATABASE_URL`（必填）
    /// * `DATABASE_TABLE_PREFIX`
    /// * `DATABASE_MAX_CONNECTIONS`
    /// * `DATABASE_CONNECT_TIMEOUT`（秒）
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DatabaseError::Config("DATABASE_URL is not set".to_string()))?;

        let mut config = Self::new(url);
        if let Some(prefix) = lookup("DATABASE_TABLE_PREFIX") {
            config.table_prefix = prefix;
        }
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = parse_number("DATABASE_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = lookup("DATABASE_CONNECT_TIMEOUT") {
            config.connect_timeout_secs = parse_number("DATABASE_CONNECT_TIMEOUT", &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(DatabaseError::Config(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DatabaseError::Config(format!("{key} must be a number, got <{raw}>")))
}
