//! 参数值与结果列值

use crate::driver::DbDriver;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// 语句参数或结果列的值
///
/// 作为参数时会被转义为 SQL 字面量；`Array` 只在参数中出现，
/// 渲染为逗号分隔的字面量列表，用于 `IN (...)`。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
}

impl Value {
    /// 转换为指定数据库的 SQL 字面量
    pub fn to_sql_literal(&self, driver: DbDriver) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.is_finite() => f.to_string(),
            Value::Float(_) => "NULL".to_string(),
            Value::Text(s) => driver.quote_string(s),
            Value::Date(d) => format!("'{}'", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => format!("'{}'", dt.format(DATETIME_FORMAT)),
            Value::Bytes(b) => driver.quote_bytes(b),
            Value::Array(items) => items
                .iter()
                .map(|item| item.to_sql_literal(driver))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 整数视图；文本会尝试解析（部分驱动把 COUNT/DECIMAL 返回为文本）
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// 文本形式，用作键值映射的键
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", u8::from(*b)),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Bytes(b) => f.write_str(&hex::encode(b)),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Text(i.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// 构建参数列表：`params![1, "text", None::<i64>]`
#[macro_export]
macro_rules! params {
    ($($val:expr),* $(,)?) => {
        &[$($crate::Value::from($val)),*][..]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_literals() {
        let d = DbDriver::Sqlite;
        assert_eq!(Value::Null.to_sql_literal(d), "NULL");
        assert_eq!(Value::Bool(true).to_sql_literal(d), "1");
        assert_eq!(Value::Bool(false).to_sql_literal(d), "0");
        assert_eq!(Value::Int(-42).to_sql_literal(d), "-42");
        assert_eq!(Value::Float(1.5).to_sql_literal(d), "1.5");
        assert_eq!(Value::Float(f64::NAN).to_sql_literal(d), "NULL");
        assert_eq!(Value::from("it's").to_sql_literal(d), "'it''s'");
    }

    #[test]
    fn test_date_literals() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from(date).to_sql_literal(DbDriver::MySql), "'2024-02-29'");
        let dt = date.and_hms_opt(13, 5, 9).unwrap();
        assert_eq!(
            Value::from(dt).to_sql_literal(DbDriver::Postgres),
            "'2024-02-29 13:05:09'"
        );
    }

    #[test]
    fn test_array_literal_is_comma_joined() {
        let v = Value::from(vec!["a", "b'c"]);
        assert_eq!(v.to_sql_literal(DbDriver::MySql), "'a', 'b\\'c'");

        let mixed = Value::Array(vec![Value::Int(1), Value::Null, Value::Bool(true)]);
        assert_eq!(mixed.to_sql_literal(DbDriver::Sqlite), "1, NULL, 1");
    }

    #[test]
    fn test_option_and_unsigned_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3i32)), Value::Int(3));
        assert_eq!(Value::from(u64::MAX), Value::Text(u64::MAX.to_string()));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::from("12").as_i64(), Some(12));
        assert_eq!(Value::Float(3.0).as_i64(), Some(3));
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn test_display_key() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::from("k").to_string(), "k");
    }

    #[test]
    fn test_params_macro() {
        let params = crate::params![1i64, "x", None::<i64>];
        assert_eq!(params.len(), 3);
        assert_eq!(params[2], Value::Null);
    }
}
