//! 数据库操作的统一接口
//!
//! 各后端适配器只需实现 `driver`、`prefix`、`fetch_rows`、`execute_sql` 四个方法，
//! 转义、语句构建以及 select/insert/update/delete 由默认实现提供。

use crate::driver::DbDriver;
use crate::error::Result;
use crate::row::Row;
use crate::statement::{add_limit, apply_prefix, interpolate};
use crate::value::Value;
use async_trait::async_trait;

/// 主键 ID 类型
pub type Id = i64;

/// 执行非查询语句的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// 后端未提供时为 0
    pub last_insert_id: Id,
}

#[async_trait]
pub trait DatabaseInterface: Send + Sync {
    /// 获取驱动类型
    fn driver(&self) -> DbDriver;

    /// 替换 `{TABLE_PREFIX}` 使用的表前缀
    fn prefix(&self) -> &str;

    /// 执行最终 SQL 并返回所有行（不做任何插值或替换）
    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>>;

    /// 执行最终 SQL，返回受影响行数与最后插入 ID
    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome>;

    /// 将值转义为当前后端的 SQL 字面量
    fn escape(&self, value: &Value) -> String {
        value.to_sql_literal(self.driver())
    }

    /// 转义参数、代入占位符并替换表前缀，得到可执行的 SQL
    fn statement(&self, stmt: &str, params: &[Value]) -> Result<String> {
        let literals: Vec<String> = params.iter().map(|p| self.escape(p)).collect();
        let stmt = interpolate(stmt, &literals)?;
        Ok(apply_prefix(&stmt, self.prefix()))
    }

    async fn query(&self, stmt: &str, params: &[Value]) -> Result<Vec<Row>> {
        let sql = self.statement(stmt, params)?;
        self.fetch_rows(&sql).await
    }

    /// 查询多行；`count` 为 `Some` 时注入 LIMIT
    async fn select(
        &self,
        stmt: &str,
        params: &[Value],
        count: Option<u64>,
        offset: u64,
    ) -> Result<Vec<Row>> {
        let stmt = add_limit(self.driver(), stmt, count, offset);
        self.query(&stmt, params).await
    }

    /// 返回受影响行数
    async fn update(&self, stmt: &str, params: &[Value]) -> Result<u64> {
        let sql = self.statement(stmt, params)?;
        Ok(self.execute_sql(&sql).await?.rows_affected)
    }

    async fn delete(&self, stmt: &str, params: &[Value]) -> Result<u64> {
        self.update(stmt, params).await
    }

    /// 返回最后插入的 ID
    async fn insert(&self, stmt: &str, params: &[Value]) -> Result<Id> {
        let sql = self.statement(stmt, params)?;
        Ok(self.execute_sql(&sql).await?.last_insert_id)
    }
}
