//! SQLite 适配器

use super::{decode_error, decode_fallback, decode_row, query_failed};
use crate::config::DatabaseConfig;
use crate::driver::DbDriver;
use crate::error::{DatabaseError, Result};
use crate::interface::{DatabaseInterface, ExecOutcome};
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row as _, SqlitePool, TypeInfo, ValueRef};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    prefix: String,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    /// 连接 SQLite，文件不存在时创建
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(DatabaseError::Connection)?
            .create_if_missing(true);

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(DatabaseError::Connection)?;
        Ok(Self::new(pool, config.table_prefix.clone()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// 内存数据库随最后一个连接关闭而消失，因此固定保留唯一的连接，不做空闲回收
fn pool_options(config: &DatabaseConfig) -> SqlitePoolOptions {
    let options = SqlitePoolOptions::new().acquire_timeout(config.connect_timeout());
    if is_memory_url(&config.url) {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options.max_connections(config.max_connections)
    }
}

#[async_trait]
impl DatabaseInterface for SqliteDatabase {
    fn driver(&self) -> DbDriver {
        DbDriver::Sqlite
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "sqlite fetch");
        let rows = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed(sql, e))?;
        rows.iter().map(|row| decode_row(row, decode_column)).collect()
    }

    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "sqlite execute");
        let result = sqlx::query(sql)
            .persistent(false)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed(sql, e))?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }
}

/// SQLite 是动态类型，按值的实际存储类型（INTEGER/REAL/TEXT/BLOB）解码，
/// 不看列声明的类型
fn decode_column(row: &SqliteRow, index: usize, column: &str) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(|e| decode_error(column, e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let storage = raw.type_info().name().to_string();
    let value = match storage.as_str() {
        "INTEGER" | "BIGINT" | "INT" | "BOOLEAN" => {
            row.try_get_unchecked::<i64, _>(index).map(Value::Int)
        }
        "REAL" | "FLOAT" | "DOUBLE" => row.try_get_unchecked::<f64, _>(index).map(Value::Float),
        "TEXT" | "DATE" | "TIME" | "DATETIME" => {
            row.try_get_unchecked::<String, _>(index).map(Value::Text)
        }
        "BLOB" => row.try_get_unchecked::<Vec<u8>, _>(index).map(Value::Bytes),
        _ => return decode_fallback(row, index, column),
    };

    value.or_else(|_| decode_fallback(row, index, column))
}
