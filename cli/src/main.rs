mod args;

use anyhow::{Context, Result};
use args::{parse_condition, parse_value, Args, Command};
use clap::Parser;
use sqlxkit::{Conditions, Database, DatabaseConfig, DatabaseInterface, QueryHelper, Value};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sqlxkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    eprintln!("✅ Connected to {:?} database", db.driver());

    let output = run(&db, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_config(args: &Args) -> Result<DatabaseConfig> {
    let mut config = match &args.database_url {
        Some(url) => DatabaseConfig::new(url.clone()),
        None => DatabaseConfig::from_env().context("DATABASE_URL is required (flag or env)")?,
    };
    if let Some(prefix) = &args.prefix {
        config.table_prefix = prefix.clone();
    }
    if let Some(max) = args.max_connections {
        config.max_connections = max;
    }
    Ok(config)
}

fn conditions_from(raw: &[String]) -> Result<Conditions> {
    let mut conditions = Conditions::new();
    for item in raw {
        let (column, value) = parse_condition(item)?;
        conditions.set(column, value);
    }
    Ok(conditions)
}

async fn run(db: &Database, command: Command) -> Result<serde_json::Value> {
    let helper = QueryHelper::new(db);

    let output = match command {
        Command::Query {
            statement,
            params,
            limit,
            offset,
        } => {
            let params: Vec<Value> = params.iter().map(|p| parse_value(p)).collect();
            let rows = db
                .select(&statement, &params, limit, offset)
                .await
                .with_context(|| format!("Query failed: {statement}"))?;
            eprintln!("📋 {} row(s)", rows.len());
            serde_json::to_value(rows)?
        }
        Command::Execute { statement, params } => {
            let params: Vec<Value> = params.iter().map(|p| parse_value(p)).collect();
            let affected = db
                .update(&statement, &params)
                .await
                .with_context(|| format!("Statement failed: {statement}"))?;
            serde_json::json!({ "rows_affected": affected })
        }
        Command::Count { table, conditions } => {
            let conditions = conditions_from(&conditions)?;
            let count = helper.select_count(&table, &conditions, &[]).await?;
            serde_json::json!({ "count": count })
        }
        Command::Exists {
            table,
            column,
            value,
        } => {
            let exists = helper.entry_exists(&table, &column, parse_value(&value)).await?;
            serde_json::json!({ "exists": exists })
        }
        Command::KeyValue {
            key,
            value,
            table,
            conditions,
        } => {
            let conditions = conditions_from(&conditions)?;
            let map = helper
                .select_key_value(&key, &value, &table, &conditions, &[])
                .await?;
            serde_json::to_value(map)?
        }
        Command::KeyValues {
            key,
            columns,
            table,
            conditions,
        } => {
            let conditions = conditions_from(&conditions)?;
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let map = helper
                .select_key_values(&key, &columns, &table, &conditions, &[])
                .await?;
            serde_json::to_value(map)?
        }
    };

    Ok(output)
}
