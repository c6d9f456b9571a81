//! 各后端适配器：包装 sqlx 连接池，把原生结果行转换为统一的 [`Row`](crate::Row)

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MySqlDatabase;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

use crate::error::DatabaseError;
use crate::row::Row;
use crate::value::Value;
use sqlx::{Column, ColumnIndex, Decode, Type};

/// 记录失败日志并包装为 `QueryFailed`
pub(crate) fn query_failed(sql: &str, source: sqlx::Error) -> DatabaseError {
    tracing::warn!(target: "sqlxkit", sql = %sql, error = %source, "query failed");
    DatabaseError::QueryFailed {
        sql: sql.to_string(),
        source,
    }
}

pub(crate) fn decode_error(column: &str, source: sqlx::Error) -> DatabaseError {
    DatabaseError::Decode {
        column: column.to_string(),
        message: source.to_string(),
    }
}

/// 逐列解码整行
pub(crate) fn decode_row<R, F>(row: &R, mut decode: F) -> Result<Row, DatabaseError>
where
    R: sqlx::Row,
    F: FnMut(&R, usize, &str) -> Result<Value, DatabaseError>,
{
    let mut out = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let name = column.name();
        let value = decode(row, column.ordinal(), name)?;
        out.push(name, value);
    }
    Ok(out)
}

/// 类型名未知时依次尝试 String、i64、f64、字节，最后按原始字节读取
pub(crate) fn decode_fallback<R>(row: &R, index: usize, column: &str) -> Result<Value, DatabaseError>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> Vec<u8>: Decode<'r, R::Database> + Type<R::Database>,
{
    if let Ok(value) = row.try_get::<String, _>(index) {
        return Ok(Value::Text(value));
    }
    if let Ok(value) = row.try_get::<i64, _>(index) {
        return Ok(Value::Int(value));
    }
    if let Ok(value) = row.try_get::<f64, _>(index) {
        return Ok(Value::Float(value));
    }
    if let Ok(value) = row.try_get::<Vec<u8>, _>(index) {
        return Ok(Value::Bytes(value));
    }
    match row.try_get_unchecked::<Vec<u8>, _>(index) {
        Ok(bytes) => Ok(raw_value(bytes)),
        Err(e) => Err(decode_error(column, e)),
    }
}

/// 原始字节：合法 UTF-8 作为文本，否则保留字节
pub(crate) fn raw_value(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::Text(text),
        Err(e) => Value::Bytes(e.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value() {
        assert_eq!(raw_value(b"2024".to_vec()), Value::from("2024"));
        assert_eq!(raw_value(vec![0xff, 0x00]), Value::Bytes(vec![0xff, 0x00]));
        assert_eq!(raw_value(Vec::new()), Value::from(""));
    }
}
