use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub model_path: Option<PathBuf>,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: validate_database_url(
                std::env::var("DB_URL")
                    .or_else(|_| std::env::var("DATABASE_URL"))
                    .unwrap_or_else(|_| "sqlite://predictions.db".to_string()),
            )?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_path: std::env::var("MODEL_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive integer"))
                .and_then(|n| {
                    if n == 0 {
                        anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
                    }
                    Ok(n)
                })?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database URL: {}", config.database_url);
        match config.model_path {
            Some(ref path) => tracing::debug!("Model path: {}", path.display()),
            None => tracing::debug!("Model path not set, baseline model will be used"),
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Accepts only SQLite connection strings; the prediction log lives in an embedded store.
pub fn validate_database_url(url: String) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("DATABASE_URL cannot be empty");
    }
    if !url.starts_with("sqlite:") {
        anyhow::bail!("DATABASE_URL must start with sqlite:");
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sqlite_urls() {
        assert!(validate_database_url("sqlite://predictions.db".into()).is_ok());
        assert!(validate_database_url("sqlite::memory:".into()).is_ok());
    }

    #[test]
    fn rejects_other_databases() {
        assert!(validate_database_url("postgres://localhost/db".into()).is_err());
        assert!(validate_database_url("   ".into()).is_err());
    }
}
