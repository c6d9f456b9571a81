use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
    #[error("Could not connect to database: {0}")]
    Connection(#[source] sqlx::Error),
    /// 原生驱动执行失败，携带最终发送的 SQL
    #[error("query <{sql}> failed! ({source})")]
    QueryFailed {
        sql: String,
        #[source]
        source: sqlx::Error,
    },
    /// 结果集中的某一列无法转换为 Value
    #[error("Could not decode column <{column}>: {message}")]
    Decode { column: String, message: String },
    #[error("WHERE-Condition in stmt <{0}> already set")]
    WhereConditionAlreadySet(String),
    #[error("Invalid identifier <{0}> given")]
    InvalidIdentifier(String),
    #[error("Invalid type for column <{0}> given")]
    InvalidConditionValue(String),
    /// 语句中的占位符数量多于参数数量
    #[error("Too few arguments for statement <{stmt}>: {given} given")]
    TooFewArguments { stmt: String, given: usize },
    /// 语句没有占位符，传入的参数无处代入
    #[error("Statement <{stmt}> takes no parameters: {given} given")]
    UnusedParameters { stmt: String, given: usize },
    #[error("Invalid placeholder <{placeholder}> in statement <{stmt}>")]
    InvalidPlaceholder { stmt: String, placeholder: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
