//! 常用查询的便捷封装
//!
//! 在 [`DatabaseInterface`] 之上组合条件构建，提供单行、单值、单列、
//! 键值映射、计数与存在性检查。

use crate::conditions::{has_where, quote_identifier, Conditions};
use crate::error::{DatabaseError, Result};
use crate::interface::DatabaseInterface;
use crate::key_map::KeyMap;
use crate::row::Row;
use crate::value::Value;

const KEY_ALIAS: &str = "k";
const VALUE_ALIAS: &str = "v";
const COUNT_ALIAS: &str = "cnt";

pub struct QueryHelper<'a, D: DatabaseInterface + ?Sized> {
    database: &'a D,
}

impl<'a, D: DatabaseInterface + ?Sized> QueryHelper<'a, D> {
    pub fn new(database: &'a D) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &'a D {
        self.database
    }

    /// 返回第 `row` 行（从 0 开始），不存在时返回 `None`
    pub async fn select_row(&self, stmt: &str, params: &[Value], row: u64) -> Result<Option<Row>> {
        let rows = self.database.select(stmt, params, Some(1), row).await?;
        Ok(rows.into_iter().next())
    }

    /// 第一行第一列的值
    pub async fn select_single(&self, stmt: &str, params: &[Value]) -> Result<Option<Value>> {
        let row = self.select_row(stmt, params, 0).await?;
        Ok(row.and_then(Row::into_first))
    }

    /// 每一行第一列的值
    pub async fn select_column(&self, stmt: &str, params: &[Value]) -> Result<Vec<Value>> {
        let rows = self.database.select(stmt, params, None, 0).await?;
        Ok(rows
            .into_iter()
            .filter_map(Row::into_first)
            .collect())
    }

    /// `SELECT key AS k, value AS v FROM table` 映射为 k → v
    ///
    /// 按结果顺序返回；键重复时后出现的值覆盖前面的，位置不变。
    /// 生成的语句只含校验过的标识符，没有占位符，`params` 必须为空。
    pub async fn select_key_value(
        &self,
        key: &str,
        value: &str,
        table: &str,
        conditions: &Conditions,
        params: &[Value],
    ) -> Result<KeyMap<Value>> {
        let driver = self.database.driver();
        let stmt = format!(
            "SELECT {} AS {}, {} AS {} FROM {}",
            self.identifier(key)?,
            driver.quote_identifier(KEY_ALIAS),
            self.identifier(value)?,
            driver.quote_identifier(VALUE_ALIAS),
            self.identifier(table)?,
        );

        let rows = self.conditional_query(&stmt, conditions, params).await?;
        let mut map = KeyMap::with_capacity(rows.len());
        for mut row in rows {
            let k = row.remove(KEY_ALIAS).unwrap_or(Value::Null);
            let v = row.remove(VALUE_ALIAS).unwrap_or(Value::Null);
            map.insert(k.to_string(), v);
        }
        Ok(map)
    }

    /// `SELECT key AS k, v1, v2 FROM table` 映射为 k → 去掉 k 之后的整行，保持结果顺序
    pub async fn select_key_values(
        &self,
        key: &str,
        values: &[&str],
        table: &str,
        conditions: &Conditions,
        params: &[Value],
    ) -> Result<KeyMap<Row>> {
        let columns = values
            .iter()
            .map(|column| self.identifier(column))
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = format!(
            "SELECT {} AS {}",
            self.identifier(key)?,
            self.database.driver().quote_identifier(KEY_ALIAS),
        );
        for column in &columns {
            stmt.push_str(", ");
            stmt.push_str(column);
        }
        stmt.push_str(" FROM ");
        stmt.push_str(&self.identifier(table)?);

        let rows = self.conditional_query(&stmt, conditions, params).await?;
        let mut map = KeyMap::with_capacity(rows.len());
        for mut row in rows {
            let k = row.remove(KEY_ALIAS).unwrap_or(Value::Null);
            map.insert(k.to_string(), row);
        }
        Ok(map)
    }

    /// `SELECT COUNT(*) AS cnt FROM table [WHERE ...]`，`params` 必须为空
    pub async fn select_count(
        &self,
        table: &str,
        conditions: &Conditions,
        params: &[Value],
    ) -> Result<u64> {
        let stmt = format!(
            "SELECT COUNT(*) AS {} FROM {}",
            self.database.driver().quote_identifier(COUNT_ALIAS),
            self.identifier(table)?,
        );
        let rows = self.conditional_query(&stmt, conditions, params).await?;
        let count = rows
            .into_iter()
            .next()
            .and_then(Row::into_first)
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// 表中是否存在 `column = value` 的记录
    pub async fn entry_exists(
        &self,
        table: &str,
        column: &str,
        value: impl Into<Value> + Send,
    ) -> Result<bool> {
        let conditions = Conditions::new().and(column, value);
        Ok(self.select_count(table, &conditions, &[]).await? > 0)
    }

    fn identifier(&self, name: &str) -> Result<String> {
        quote_identifier(self.database, name)
    }

    /// 先处理模板，再追加条件，避免条件字面量中的 `%` 被当作占位符
    async fn conditional_query(
        &self,
        stmt: &str,
        conditions: &Conditions,
        params: &[Value],
    ) -> Result<Vec<Row>> {
        if has_where(stmt) {
            return Err(DatabaseError::WhereConditionAlreadySet(stmt.to_string()));
        }
        if !params.is_empty() {
            return Err(DatabaseError::UnusedParameters {
                stmt: stmt.to_string(),
                given: params.len(),
            });
        }
        let mut sql = self.database.statement(stmt, params)?;
        sql.push_str(&conditions.render(self.database)?);
        self.database.fetch_rows(&sql).await
    }
}
