use sqlxkit::{params, Conditions, DatabaseConfig, DatabaseInterface, QueryHelper, SqliteDatabase, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    println!("Connecting to SQLite database...");
    let config = DatabaseConfig::new(database_url).with_prefix("demo");
    let db = SqliteDatabase::connect(&config).await?;
    println!("Connected successfully!\n");

    db.update(
        "CREATE TABLE IF NOT EXISTS {TABLE_PREFIX}_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            email TEXT,
            is_del INTEGER NOT NULL DEFAULT 0
        )",
        &[],
    )
    .await?;

    // ========== 1. INSERT (插入) ==========
    println!("=== 1. INSERT (插入新记录) ===");
    let mut ids = Vec::new();
    for name in ["alice", "bob", "o'neil"] {
        let id = db
            .insert(
                "INSERT INTO {TABLE_PREFIX}_user (username, email) VALUES (%s, %s)",
                params![name, format!("{name}@example.com")],
            )
            .await?;
        println!("插入成功，ID: {}", id);
        ids.push(id);
    }
    println!();

    let helper = QueryHelper::new(&db);

    // ========== 2. SELECT_ROW (按偏移取单行) ==========
    println!("=== 2. SELECT_ROW (按偏移取单行) ===");
    let row = helper
        .select_row("SELECT * FROM {TABLE_PREFIX}_user ORDER BY id", &[], 1)
        .await?;
    println!("第二行: {:?}\n", row);

    // ========== 3. SELECT_SINGLE (单值) ==========
    println!("=== 3. SELECT_SINGLE (单值) ===");
    let email = helper
        .select_single(
            "SELECT email FROM {TABLE_PREFIX}_user WHERE username = %s",
            params!["o'neil"],
        )
        .await?;
    println!("o'neil 的邮箱: {:?}\n", email);

    // ========== 4. KEY_VALUE (键值映射) ==========
    println!("=== 4. KEY_VALUE (键值映射) ===");
    let names = helper
        .select_key_value(
            "id",
            "username",
            "{TABLE_PREFIX}_user",
            &Conditions::new().and("id", ids.clone()),
            &[],
        )
        .await?;
    for (id, name) in &names {
        println!("  {} => {}", id, name);
    }
    println!();

    // ========== 5. KEY_VALUES (键到行) ==========
    println!("=== 5. KEY_VALUES (键到行) ===");
    let users = helper
        .select_key_values(
            "username",
            &["id", "email"],
            "{TABLE_PREFIX}_user",
            &Conditions::new().and("is_del", 0),
            &[],
        )
        .await?;
    for (name, row) in &users {
        println!("  {} => {:?}", name, row);
    }
    println!();

    // ========== 6. UPDATE / COUNT / EXISTS ==========
    println!("=== 6. UPDATE / COUNT / EXISTS ===");
    let affected = db
        .update(
            "UPDATE {TABLE_PREFIX}_user SET is_del = 1 WHERE username = %s",
            params!["bob"],
        )
        .await?;
    println!("逻辑删除 {} 条", affected);

    let active = helper
        .select_count("{TABLE_PREFIX}_user", &Conditions::new().and("is_del", 0), &[])
        .await?;
    println!("未删除用户数: {}", active);

    let exists = helper
        .entry_exists("{TABLE_PREFIX}_user", "username", "mallory")
        .await?;
    println!("mallory 是否存在: {}\n", exists);

    // ========== 7. DELETE (删除) ==========
    println!("=== 7. DELETE (删除) ===");
    let deleted = db
        .delete(
            "DELETE FROM {TABLE_PREFIX}_user WHERE id IN(%s)",
            &[Value::from(ids)],
        )
        .await?;
    println!("删除 {} 条", deleted);

    Ok(())
}
