#[cfg(not(any(feature = "mysql", feature = "postgres", feature = "sqlite")))]
compile_error!("sqlxkit: enable at least one of the `mysql`, `postgres` or `sqlite` features");

pub mod adapter;
pub mod conditions;
pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod interface;
pub mod key_map;
pub mod query_helper;
pub mod row;
pub mod statement;
pub mod value;

#[cfg(test)]
mod test_support;

#[cfg(feature = "mysql")]
pub use adapter::MySqlDatabase;
#[cfg(feature = "postgres")]
pub use adapter::PostgresDatabase;
#[cfg(feature = "sqlite")]
pub use adapter::SqliteDatabase;
pub use conditions::{add_conditions, check_identifier, Conditions};
pub use config::DatabaseConfig;
pub use database::Database;
pub use driver::DbDriver;
pub use interface::{DatabaseInterface, ExecOutcome, Id};
pub use key_map::KeyMap;
pub use query_helper::QueryHelper;
pub use row::Row;
pub use value::Value;

pub use error::{DatabaseError, Result};
