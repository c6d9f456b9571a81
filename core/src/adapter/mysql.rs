//! MySQL / MariaDB 适配器

use super::{decode_error, decode_fallback, decode_row, query_failed};
use crate::config::DatabaseConfig;
use crate::driver::DbDriver;
use crate::error::{DatabaseError, Result};
use crate::interface::{DatabaseInterface, ExecOutcome};
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{Column, MySqlPool, Row as _, TypeInfo};

#[derive(Debug, Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
    prefix: String,
}

impl MySqlDatabase {
    pub fn new(pool: MySqlPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connection)?;
        Ok(Self::new(pool, config.table_prefix.clone()))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseInterface for MySqlDatabase {
    fn driver(&self) -> DbDriver {
        DbDriver::MySql
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "mysql fetch");
        let rows = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed(sql, e))?;
        rows.iter().map(|row| decode_row(row, decode_column)).collect()
    }

    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "mysql execute");
        let result = sqlx::query(sql)
            .persistent(false)
            .execute(&self.pool)
            .await
            .map_err(|e| query_failed(sql, e))?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: i64::try_from(result.last_insert_id()).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MySqlKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Time,
    Year,
    Binary,
    Json,
    Other,
}

fn classify(type_name: &str) -> MySqlKind {
    match type_name {
        "BOOLEAN" => MySqlKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => MySqlKind::Signed,
        name if name.ends_with("UNSIGNED") => MySqlKind::Unsigned,
        "FLOAT" => MySqlKind::Float,
        "DOUBLE" => MySqlKind::Double,
        "DECIMAL" => MySqlKind::Decimal,
        "DATE" => MySqlKind::Date,
        "DATETIME" | "TIMESTAMP" => MySqlKind::DateTime,
        "TIME" => MySqlKind::Time,
        "YEAR" => MySqlKind::Year,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
            MySqlKind::Binary
        }
        "JSON" => MySqlKind::Json,
        _ => MySqlKind::Other,
    }
}

fn decode_column(row: &MySqlRow, index: usize, column: &str) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(|e| decode_error(column, e))?;
    if sqlx::ValueRef::is_null(&raw) {
        return Ok(Value::Null);
    }

    let value = match classify(row.columns()[index].type_info().name()) {
        MySqlKind::Bool => row.try_get::<bool, _>(index).map(Value::Bool),
        MySqlKind::Signed => row.try_get::<i64, _>(index).map(Value::Int),
        MySqlKind::Unsigned => row.try_get::<u64, _>(index).map(Value::from),
        MySqlKind::Float => row.try_get::<f32, _>(index).map(Value::from),
        MySqlKind::Double => row.try_get::<f64, _>(index).map(Value::Float),
        // DECIMAL 以文本返回，避免精度丢失
        MySqlKind::Decimal => row
            .try_get::<BigDecimal, _>(index)
            .map(|d| Value::Text(d.to_string())),
        MySqlKind::Date => row.try_get::<NaiveDate, _>(index).map(Value::Date),
        MySqlKind::DateTime => row.try_get::<NaiveDateTime, _>(index).map(Value::DateTime),
        MySqlKind::Time => row
            .try_get::<NaiveTime, _>(index)
            .map(|t| Value::Text(t.to_string())),
        // YEAR 没有对应的 Rust 类型，按无符号整数读取
        MySqlKind::Year => row
            .try_get_unchecked::<u16, _>(index)
            .map(|year| Value::Int(i64::from(year))),
        MySqlKind::Binary => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        MySqlKind::Json => row
            .try_get::<serde_json::Value, _>(index)
            .map(|json| Value::Text(json.to_string())),
        MySqlKind::Other => return decode_fallback(row, index, column),
    };

    match value {
        Ok(value) => Ok(value),
        Err(_) => decode_fallback(row, index, column),
    }
}
