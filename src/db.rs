use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const CREATE_PREDICTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        income INTEGER NOT NULL,
        loan_amount REAL NOT NULL,
        credit_history INTEGER NOT NULL,
        age INTEGER NOT NULL,
        gender TEXT NOT NULL,
        married TEXT NOT NULL,
        education TEXT NOT NULL,
        self_employed TEXT NOT NULL,
        dependents TEXT NOT NULL,
        property_area TEXT NOT NULL,
        loan_term INTEGER NOT NULL,
        dti REAL NOT NULL,
        lta REAL NOT NULL,
        risk_score REAL NOT NULL,
        decision TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is pinned
    /// to one connection that is never recycled.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(CREATE_PREDICTIONS_TABLE).execute(pool).await?;
        Ok(())
    }
}
