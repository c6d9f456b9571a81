//! PostgreSQL 适配器

use super::{decode_error, decode_fallback, decode_row, query_failed};
use crate::config::DatabaseConfig;
use crate::driver::DbDriver;
use crate::error::{DatabaseError, Result};
use crate::interface::{DatabaseInterface, ExecOutcome};
use crate::row::Row;
use crate::value::Value;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::postgres::types::{PgInterval, PgMoney};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Uuid;
use sqlx::{Column, PgPool, Row as _, TypeInfo};

#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    prefix: String,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool, prefix: impl Into<String>) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
        }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connection)?;
        Ok(Self::new(pool, config.table_prefix.clone()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("INSERT"))
}

#[async_trait]
impl DatabaseInterface for PostgresDatabase {
    fn driver(&self) -> DbDriver {
        DbDriver::Postgres
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "postgres fetch");
        let rows = sqlx::query(sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed(sql, e))?;
        rows.iter().map(|row| decode_row(row, decode_column)).collect()
    }

    /// PostgreSQL 没有 last_insert_id，INSERT 之后在同一连接上读取 `lastval()`，
    /// 本会话未使用过序列时为 0
    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome> {
        tracing::debug!(target: "sqlxkit", sql = %sql, "postgres execute");
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| query_failed(sql, e))?;
        let result = sqlx::query(sql)
            .persistent(false)
            .execute(&mut *conn)
            .await
            .map_err(|e| query_failed(sql, e))?;

        let last_insert_id = if is_insert(sql) {
            sqlx::query_scalar::<_, i64>("SELECT lastval()")
                .fetch_one(&mut *conn)
                .await
                .unwrap_or_default()
        } else {
            0
        };

        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }
}

/// 按列类型名归类，决定解码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PgKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Money,
    Date,
    Timestamp,
    TimestampTz,
    Time,
    Interval,
    Bytea,
    Json,
    Uuid,
    TextArray,
    BoolArray,
    Int2Array,
    Int4Array,
    Int8Array,
    Float4Array,
    Float8Array,
    NumericArray,
    UuidArray,
    Other,
}

fn classify(type_name: &str) -> PgKind {
    match type_name {
        "BOOL" => PgKind::Bool,
        "INT2" => PgKind::Int2,
        "INT4" => PgKind::Int4,
        "INT8" => PgKind::Int8,
        "FLOAT4" => PgKind::Float4,
        "FLOAT8" => PgKind::Float8,
        "NUMERIC" => PgKind::Numeric,
        "MONEY" => PgKind::Money,
        "DATE" => PgKind::Date,
        "TIMESTAMP" => PgKind::Timestamp,
        "TIMESTAMPTZ" => PgKind::TimestampTz,
        "TIME" => PgKind::Time,
        "INTERVAL" => PgKind::Interval,
        "BYTEA" => PgKind::Bytea,
        "JSON" | "JSONB" => PgKind::Json,
        "UUID" => PgKind::Uuid,
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" | "CHAR[]" => PgKind::TextArray,
        "BOOL[]" => PgKind::BoolArray,
        "INT2[]" => PgKind::Int2Array,
        "INT4[]" => PgKind::Int4Array,
        "INT8[]" => PgKind::Int8Array,
        "FLOAT4[]" => PgKind::Float4Array,
        "FLOAT8[]" => PgKind::Float8Array,
        "NUMERIC[]" => PgKind::NumericArray,
        "UUID[]" => PgKind::UuidArray,
        _ => PgKind::Other,
    }
}

fn decode_column(row: &PgRow, index: usize, column: &str) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(|e| decode_error(column, e))?;
    if sqlx::ValueRef::is_null(&raw) {
        return Ok(Value::Null);
    }

    let value = match classify(row.columns()[index].type_info().name()) {
        PgKind::Bool => row.try_get::<bool, _>(index).map(Value::Bool),
        PgKind::Int2 => row.try_get::<i16, _>(index).map(Value::from),
        PgKind::Int4 => row.try_get::<i32, _>(index).map(Value::from),
        PgKind::Int8 => row.try_get::<i64, _>(index).map(Value::Int),
        PgKind::Float4 => row.try_get::<f32, _>(index).map(Value::from),
        PgKind::Float8 => row.try_get::<f64, _>(index).map(Value::Float),
        PgKind::Numeric => row
            .try_get::<BigDecimal, _>(index)
            .map(|d| Value::Text(d.to_string())),
        PgKind::Money => row
            .try_get::<PgMoney, _>(index)
            .map(|m| Value::Text(m.to_bigdecimal(2).to_string())),
        PgKind::Date => row.try_get::<NaiveDate, _>(index).map(Value::Date),
        PgKind::Timestamp => row.try_get::<NaiveDateTime, _>(index).map(Value::DateTime),
        PgKind::TimestampTz => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|dt| Value::DateTime(dt.naive_utc())),
        PgKind::Time => row
            .try_get::<NaiveTime, _>(index)
            .map(|t| Value::Text(t.to_string())),
        PgKind::Interval => row
            .try_get::<PgInterval, _>(index)
            .map(|i| Value::Text(format_interval(&i))),
        PgKind::Bytea => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        PgKind::Json => row
            .try_get::<serde_json::Value, _>(index)
            .map(|json| Value::Text(json.to_string())),
        PgKind::Uuid => row
            .try_get::<Uuid, _>(index)
            .map(|id| Value::Text(id.to_string())),
        PgKind::TextArray => row.try_get::<Vec<Option<String>>, _>(index).map(Value::from),
        PgKind::BoolArray => row.try_get::<Vec<Option<bool>>, _>(index).map(Value::from),
        PgKind::Int2Array => row.try_get::<Vec<Option<i16>>, _>(index).map(Value::from),
        PgKind::Int4Array => row.try_get::<Vec<Option<i32>>, _>(index).map(Value::from),
        PgKind::Int8Array => row.try_get::<Vec<Option<i64>>, _>(index).map(Value::from),
        PgKind::Float4Array => row.try_get::<Vec<Option<f32>>, _>(index).map(Value::from),
        PgKind::Float8Array => row.try_get::<Vec<Option<f64>>, _>(index).map(Value::from),
        PgKind::NumericArray => row.try_get::<Vec<Option<BigDecimal>>, _>(index).map(|items| {
            Value::Array(
                items
                    .into_iter()
                    .map(|d| d.map_or(Value::Null, |d| Value::Text(d.to_string())))
                    .collect(),
            )
        }),
        PgKind::UuidArray => row.try_get::<Vec<Option<Uuid>>, _>(index).map(|items| {
            Value::Array(
                items
                    .into_iter()
                    .map(|id| id.map_or(Value::Null, |id| Value::Text(id.to_string())))
                    .collect(),
            )
        }),
        PgKind::Other => return decode_fallback(row, index, column),
    };

    match value {
        Ok(value) => Ok(value),
        Err(_) => decode_fallback(row, index, column),
    }
}

/// 与 PostgreSQL 默认输出风格一致：`1 year 2 mons 3 days 04:05:06.5`
fn format_interval(interval: &PgInterval) -> String {
    fn unit(n: i32, name: &str) -> String {
        if n.abs() == 1 {
            format!("{n} {name}")
        } else {
            format!("{n} {name}s")
        }
    }

    let mut parts = Vec::new();
    let (years, months) = (interval.months / 12, interval.months % 12);
    if years != 0 {
        parts.push(unit(years, "year"));
    }
    if months != 0 {
        parts.push(unit(months, "mon"));
    }
    if interval.days != 0 {
        parts.push(unit(interval.days, "day"));
    }
    if interval.microseconds != 0 || parts.is_empty() {
        let sign = if interval.microseconds < 0 { "-" } else { "" };
        let micros = interval.microseconds.unsigned_abs();
        let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);
        let mut time = format!(
            "{sign}{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        if frac != 0 {
            let frac = format!("{frac:06}");
            time.push('.');
            time.push_str(frac.trim_end_matches('0'));
        }
        parts.push(time);
    }
    parts.join(" ")
}
