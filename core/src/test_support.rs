//! 单元测试用的内存适配器：记录收到的 SQL，按顺序返回预置的结果

use crate::driver::DbDriver;
use crate::error::Result;
use crate::interface::{DatabaseInterface, ExecOutcome};
use crate::row::Row;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) struct FakeDatabase {
    driver: DbDriver,
    prefix: String,
    executed: Mutex<Vec<String>>,
    results: Mutex<VecDeque<Vec<Row>>>,
    outcome: ExecOutcome,
}

impl FakeDatabase {
    pub(crate) fn new(driver: DbDriver) -> Self {
        Self {
            driver,
            prefix: "sfw2".to_string(),
            executed: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            outcome: ExecOutcome::default(),
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub(crate) fn with_outcome(mut self, rows_affected: u64, last_insert_id: i64) -> Self {
        self.outcome = ExecOutcome {
            rows_affected,
            last_insert_id,
        };
        self
    }

    /// 下一次 fetch_rows 返回的结果
    pub(crate) fn push_result(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub(crate) fn last_sql(&self) -> String {
        self.executed.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseInterface for FakeDatabase {
    fn driver(&self) -> DbDriver {
        self.driver
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[tokio::test]
    async fn test_select_injects_limit_then_interpolates() {
        let db = FakeDatabase::new(DbDriver::MySql);
        db.select(
            "SELECT * FROM {TABLE_PREFIX}_user WHERE name = %s LIMIT 99",
            &[Value::from("bob")],
            Some(10),
            20,
        )
        .await
        .unwrap();
        assert_eq!(
            db.last_sql(),
            "SELECT * FROM sfw2_user WHERE name = 'bob' LIMIT 20, 10"
        );
    }

    #[tokio::test]
    async fn test_update_delete_insert_use_outcome() {
        let db = FakeDatabase::new(DbDriver::Sqlite).with_outcome(3, 42);
        let affected = db
            .update("UPDATE t SET a = %s WHERE id IN(%s)", &[Value::Null, Value::from(vec![1i64, 2])])
            .await
            .unwrap();
        assert_eq!(affected, 3);
        assert_eq!(db.last_sql(), "UPDATE t SET a = NULL WHERE id IN(1, 2)");

        assert_eq!(db.delete("DELETE FROM t", &[]).await.unwrap(), 3);
        assert_eq!(db.insert("INSERT INTO t (a) VALUES (%s)", &[Value::Bool(true)]).await.unwrap(), 42);
        assert_eq!(db.last_sql(), "INSERT INTO t (a) VALUES (1)");
        assert_eq!(db.executed().len(), 3);
    }

    #[test]
    fn test_statement_escapes_per_driver() {
        let mysql = FakeDatabase::new(DbDriver::MySql);
        let sqlite = FakeDatabase::new(DbDriver::Sqlite);
        let params = [Value::from("it's")];
        assert_eq!(mysql.statement("x = %s", &params).unwrap(), "x = 'it\\'s'");
        assert_eq!(sqlite.statement("x = %s", &params).unwrap(), "x = 'it''s'");
    }
}
