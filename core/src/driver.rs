//! 数据库驱动类型及其方言差异（字符串转义、标识符引用、LIMIT 语法）

use crate::error::{DatabaseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    MySql,
    Postgres,
    Sqlite,
}

impl DbDriver {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Ok(DbDriver::MySql)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DbDriver::Postgres)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(DbDriver::Sqlite)
        } else {
            Err(DatabaseError::UnsupportedDatabase(url.to_string()))
        }
    }

    /// 将字符串转义为带引号的 SQL 字面量
    ///
    /// * MySQL: 反斜杠转义 `\0 \n \r \ ' " \x1a`，与 `mysql_real_escape_string` 一致
    /// * PostgreSQL: 单引号加倍，去掉 NUL（text 类型无法存储）
    /// * SQLite: 单引号加倍
    pub fn quote_string(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        match self {
            DbDriver::MySql => {
                for ch in value.chars() {
                    match ch {
                        '\0' => out.push_str("\\0"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '"' => out.push_str("\\\""),
                        '\x1a' => out.push_str("\\Z"),
                        _ => out.push(ch),
                    }
                }
            }
            DbDriver::Postgres => {
                for ch in value.chars() {
                    match ch {
                        '\0' => {}
                        '\'' => out.push_str("''"),
                        _ => out.push(ch),
                    }
                }
            }
            DbDriver::Sqlite => {
                for ch in value.chars() {
                    if ch == '\'' {
                        out.push_str("''");
                    } else {
                        out.push(ch);
                    }
                }
            }
        }
        out.push('\'');
        out
    }

    /// 二进制数据字面量
    pub fn quote_bytes(&self, bytes: &[u8]) -> String {
        match self {
            DbDriver::MySql | DbDriver::Sqlite => format!("X'{}'", hex::encode(bytes)),
            DbDriver::Postgres => format!("'\\x{}'::bytea", hex::encode(bytes)),
        }
    }

    /// 转义 SQL 标识符，`schema.table` 形式的每一段单独引用
    pub fn quote_identifier(&self, name: &str) -> String {
        let quote = match self {
            DbDriver::MySql => '`',
            DbDriver::Postgres | DbDriver::Sqlite => '"',
        };
        name.split('.')
            .map(|part| {
                let doubled = part.replace(quote, &format!("{quote}{quote}"));
                format!("{quote}{doubled}{quote}")
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// 生成 LIMIT 子句（不含前导空格）
    pub fn limit_clause(&self, count: u64, offset: u64) -> String {
        if offset == 0 {
            return format!("LIMIT {count}");
        }
        match self {
            DbDriver::MySql | DbDriver::Sqlite => format!("LIMIT {offset}, {count}"),
            DbDriver::Postgres => format!("LIMIT {count} OFFSET {offset}"),
        }
    }
}
