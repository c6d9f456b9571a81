//! WHERE 条件构建
//!
//! 把“列名 → 值”的有序映射渲染为 `WHERE a = 1 AND b IN(2, 3) AND c IS NULL`。
//! 列名先经过标识符校验，再按后端规则引用；值经过适配器转义。

use crate::error::{DatabaseError, Result};
use crate::interface::DatabaseInterface;
use crate::statement::apply_prefix;
use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_{}.]+$").expect("identifier pattern is valid")
});

/// 校验标识符（表名、列名）是否只包含 `[a-zA-Z0-9_{}.]`
pub fn check_identifier(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}

/// 校验后替换表前缀并按后端规则引用标识符
pub fn quote_identifier<D>(db: &D, name: &str) -> Result<String>
where
    D: DatabaseInterface + ?Sized,
{
    check_identifier(name)?;
    Ok(db.driver().quote_identifier(&apply_prefix(name, db.prefix())))
}

/// 语句中是否已经包含 WHERE（不区分大小写）
pub fn has_where(stmt: &str) -> bool {
    stmt.to_ascii_uppercase().contains(" WHERE ")
}

/// 条件集合，保持插入顺序；同一列重复设置时覆盖旧值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    items: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = value`；数组渲染为 `IN(...)`，`Value::Null` 渲染为 `IS NULL`
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.items.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.items.push((column, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 渲染为 ` WHERE ...` 片段（含前导空格）；没有条件时返回空串
    pub fn render<D>(&self, db: &D) -> Result<String>
    where
        D: DatabaseInterface + ?Sized,
    {
        if self.items.is_empty() {
            return Ok(String::new());
        }

        let mut predicates = Vec::with_capacity(self.items.len());
        for (column, value) in &self.items {
            let quoted = quote_identifier(db, column)?;
            let predicate = match value {
                Value::Array(items) if items.is_empty() => {
                    return Err(DatabaseError::InvalidConditionValue(column.clone()));
                }
                Value::Array(_) => format!("{} IN({})", quoted, db.escape(value)),
                Value::Null => format!("{} IS NULL", quoted),
                _ => format!("{} = {}", quoted, db.escape(value)),
            };
            predicates.push(predicate);
        }

        Ok(format!(" WHERE {}", predicates.join(" AND ")))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (column, value) in iter {
            conditions.set(column, value);
        }
        conditions
    }
}

/// 为语句追加 WHERE 条件
///
/// 语句中已经含有 ` WHERE ` 时返回 `WhereConditionAlreadySet`。
pub fn add_conditions<D>(db: &D, stmt: &str, conditions: &Conditions) -> Result<String>
where
    D: DatabaseInterface + ?Sized,
{
    if has_where(stmt) {
        return Err(DatabaseError::WhereConditionAlreadySet(stmt.to_string()));
    }
    Ok(format!("{}{}", stmt, conditions.render(db)?))
}
