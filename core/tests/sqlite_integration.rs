use sqlxkit::{
    Conditions, Database, DatabaseConfig, DatabaseError, DatabaseInterface, QueryHelper,
    SqliteDatabase, Value,
};

async fn setup() -> SqliteDatabase {
    let config = DatabaseConfig::new("sqlite::memory:").with_prefix("test");
    let db = SqliteDatabase::connect(&config).await.unwrap();

    db.update(
        "CREATE TABLE {TABLE_PREFIX}_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            login TEXT NOT NULL,
            email TEXT,
            age INTEGER,
            score REAL,
            deleted_at TEXT
        )",
        &[],
    )
    .await
    .unwrap();

    let users = [
        ("alice", Some("alice@example.com"), 30, 9.5),
        ("bob", Some("bob@example.com"), 25, 7.0),
        ("o'neil", None, 41, 8.25),
    ];
    for (login, email, age, score) in users {
        db.insert(
            "INSERT INTO {TABLE_PREFIX}_user (login, email, age, score) VALUES (%s, %s, %s, %s)",
            &[Value::from(login), Value::from(email), Value::from(age), Value::from(score)],
        )
        .await
        .unwrap();
    }
    db
}

#[tokio::test]
async fn test_insert_returns_last_id() {
    let db = setup().await;
    let id = db
        .insert(
            "INSERT INTO test_user (login, age) VALUES (%s, %s)",
            &[Value::from("carol"), Value::Int(19)],
        )
        .await
        .unwrap();
    assert_eq!(id, 4);
}

#[tokio::test]
async fn test_select_decodes_storage_types() {
    let db = setup().await;
    let rows = db
        .select(
            "SELECT login, email, age, score, deleted_at FROM {TABLE_PREFIX}_user ORDER BY id",
            &[],
            None,
            0,
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    let third = &rows[2];
    assert_eq!(third.get("login"), Some(&Value::from("o'neil")));
    assert_eq!(third.get("email"), Some(&Value::Null));
    assert_eq!(third.get("age"), Some(&Value::Int(41)));
    assert_eq!(third.get("score"), Some(&Value::Float(8.25)));
    assert_eq!(third.get("deleted_at"), Some(&Value::Null));
}

#[tokio::test]
async fn test_select_with_limit_and_offset() {
    let db = setup().await;
    let rows = db
        .select("SELECT login FROM test_user ORDER BY id LIMIT 100", &[], Some(2), 1)
        .await
        .unwrap();
    let logins: Vec<_> = rows.iter().filter_map(|r| r.first().cloned()).collect();
    assert_eq!(logins, vec![Value::from("bob"), Value::from("o'neil")]);
}

#[tokio::test]
async fn test_update_and_delete_report_affected_rows() {
    let db = setup().await;
    let updated = db
        .update(
            "UPDATE test_user SET deleted_at = %s WHERE age > %s",
            &[Value::from("2024-01-01 00:00:00"), Value::Int(26)],
        )
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let deleted = db
        .delete("DELETE FROM test_user WHERE login IN(%s)", &[Value::from(vec!["bob", "nobody"])])
        .await
        .unwrap();
    assert_eq!(deleted, 1);
}

#[tokio::test]
async fn test_query_failure_carries_sql() {
    let db = setup().await;
    let err = db.query("SELECT * FROM missing_table", &[]).await.unwrap_err();
    match err {
        DatabaseError::QueryFailed { sql, .. } => assert_eq!(sql, "SELECT * FROM missing_table"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_helper_row_single_and_column() {
    let db = setup().await;
    let helper = QueryHelper::new(&db);

    let row = helper
        .select_row("SELECT login, age FROM test_user ORDER BY id", &[], 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.get("login"), Some(&Value::from("bob")));

    let missing = helper
        .select_row("SELECT login FROM test_user ORDER BY id", &[], 10)
        .await
        .unwrap();
    assert!(missing.is_none());

    let max_age = helper
        .select_single("SELECT MAX(age) FROM test_user WHERE login != %s", &[Value::from("o'neil")])
        .await
        .unwrap();
    assert_eq!(max_age, Some(Value::Int(30)));

    let logins = helper
        .select_column("SELECT login FROM test_user ORDER BY login", &[])
        .await
        .unwrap();
    assert_eq!(
        logins,
        vec![Value::from("alice"), Value::from("bob"), Value::from("o'neil")]
    );
}

#[tokio::test]
async fn test_helper_key_value_maps() {
    let db = setup().await;
    let helper = QueryHelper::new(&db);

    let ages = helper
        .select_key_value("login", "age", "{TABLE_PREFIX}_user", &Conditions::new(), &[])
        .await
        .unwrap();
    assert_eq!(ages.len(), 3);
    assert_eq!(ages.get("o'neil"), Some(&Value::Int(41)));

    let conditions = Conditions::new().and("login", vec!["alice", "bob"]);
    let users = helper
        .select_key_values("id", &["login", "email"], "test_user", &conditions, &[])
        .await
        .unwrap();
    assert_eq!(users.len(), 2);
    let alice = users.get("1").unwrap();
    assert_eq!(alice.get("login"), Some(&Value::from("alice")));
    assert_eq!(alice.get("k"), None);
}

#[tokio::test]
async fn test_key_value_keeps_row_order() {
    let db = setup().await;
    db.update("CREATE TABLE test_tag (id INTEGER, name TEXT)", &[])
        .await
        .unwrap();
    for (id, name) in [(2, "two"), (10, "ten"), (1, "one"), (2, "zwei")] {
        db.insert(
            "INSERT INTO test_tag (id, name) VALUES (%s, %s)",
            &[Value::from(id), Value::from(name)],
        )
        .await
        .unwrap();
    }
    let helper = QueryHelper::new(&db);

    let tags = helper
        .select_key_value("id", "name", "test_tag", &Conditions::new(), &[])
        .await
        .unwrap();
    let keys: Vec<_> = tags.keys().collect();
    assert_eq!(keys, vec!["2", "10", "1"]);
    assert_eq!(tags.get("2"), Some(&Value::from("zwei")));
}

#[tokio::test]
async fn test_helper_count_and_exists() {
    let db = setup().await;
    let helper = QueryHelper::new(&db);

    assert_eq!(helper.select_count("test_user", &Conditions::new(), &[]).await.unwrap(), 3);

    let without_email = Conditions::new().and("email", Value::Null);
    assert_eq!(helper.select_count("test_user", &without_email, &[]).await.unwrap(), 1);

    assert!(helper.entry_exists("test_user", "login", "o'neil").await.unwrap());
    assert!(!helper.entry_exists("test_user", "login", "mallory").await.unwrap());
}

#[tokio::test]
async fn test_escaping_blocks_injection() {
    let db = setup().await;
    let helper = QueryHelper::new(&db);
    let hostile = "x' OR '1'='1";
    assert!(!helper.entry_exists("test_user", "login", hostile).await.unwrap());

    let rows = db
        .query("SELECT id FROM test_user WHERE login = %s", &[Value::from(hostile)])
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_database_dispatch_from_url() {
    let db = Database::connect_url("sqlite::memory:").await.unwrap();
    assert_eq!(db.prefix(), "sfw2");
    let one = QueryHelper::new(&db).select_single("SELECT 1", &[]).await.unwrap();
    assert_eq!(one, Some(Value::Int(1)));

    let err = Database::connect_url("oracle://localhost").await.unwrap_err();
    assert!(matches!(err, DatabaseError::UnsupportedDatabase(_)));
}

#[tokio::test]
async fn test_memory_database_is_never_reaped() {
    let db = setup().await;
    let options = db.pool().options();
    assert_eq!(options.get_idle_timeout(), None);
    assert_eq!(options.get_max_lifetime(), None);
    assert_eq!(options.get_min_connections(), 1);

    let count = QueryHelper::new(&db)
        .select_count("test_user", &Conditions::new(), &[])
        .await
        .unwrap();
    assert_eq!(count, 3);
}
