#[cfg(feature = "mysql")]
use crate::adapter::MySqlDatabase;
#[cfg(feature = "postgres")]
use crate::adapter::PostgresDatabase;
#[cfg(feature = "sqlite")]
use crate::adapter::SqliteDatabase;
use crate::config::DatabaseConfig;
use crate::driver::DbDriver;
use crate::error::{DatabaseError, Result};
use crate::interface::{DatabaseInterface, ExecOutcome};
use crate::row::Row;
use async_trait::async_trait;

/// 根据 URL 自动选择后端的数据库适配器
#[derive(Debug, Clone)]
pub enum Database {
    #[cfg(feature = "mysql")]
    MySql(MySqlDatabase),
    #[cfg(feature = "postgres")]
    Postgres(PostgresDatabase),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteDatabase),
}

impl Database {
    /// 从配置连接数据库，后端由 URL 前缀决定
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;
        let driver = DbDriver::from_url(&config.url)?;
        tracing::info!(target: "sqlxkit", driver = ?driver, prefix = %config.table_prefix, "connecting");

        match driver {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => Ok(Database::MySql(MySqlDatabase::connect(config).await?)),
            #[cfg(feature = "postgres")]
            DbDriver::Postgres => Ok(Database::Postgres(PostgresDatabase::connect(config).await?)),
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => Ok(Database::Sqlite(SqliteDatabase::connect(config).await?)),
            #[allow(unreachable_patterns)]
            _ => Err(DatabaseError::UnsupportedDatabase(format!(
                "Unsupported database driver, only mysql, postgres, sqlite is supported, got: {:?}",
                driver
            ))),
        }
    }

    /// 使用默认配置连接
    pub async fn connect_url(url: &str) -> Result<Self> {
        Self::connect(&DatabaseConfig::new(url)).await
    }

    fn inner(&self) -> &dyn DatabaseInterface {
        match self {
            #[cfg(feature = "mysql")]
            Database::MySql(db) => db,
            #[cfg(feature = "postgres")]
            Database::Postgres(db) => db,
            #[cfg(feature = "sqlite")]
            Database::Sqlite(db) => db,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<MySqlDatabase> for Database {
    fn from(db: MySqlDatabase) -> Self {
        Database::MySql(db)
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresDatabase> for Database {
    fn from(db: PostgresDatabase) -> Self {
        Database::Postgres(db)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteDatabase> for Database {
    fn from(db: SqliteDatabase) -> Self {
        Database::Sqlite(db)
    }
}

#[async_trait]
impl DatabaseInterface for Database {
    fn driver(&self) -> DbDriver {
        self.inner().driver()
    }

    fn prefix(&self) -> &str {
        self.inner().prefix()
    }

    async fn fetch_rows(&self, sql: &str) -> Result<Vec<Row>> {
        self.inner().fetch_rows(sql).await
    }

    async fn execute_sql(&self, sql: &str) -> Result<ExecOutcome> {
        self.inner().execute_sql(sql).await
    }
}
