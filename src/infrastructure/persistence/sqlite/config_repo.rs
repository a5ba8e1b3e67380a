//! SQLite Config Repository
//!
//! 站点配置键值对

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{in_placeholders, map_db_err, parse_datetime, DbPool};
use crate::application::ports::{ConfigRecord, ConfigRepositoryPort, RepositoryError};

const CONFIG_COLUMNS: &str = "id, key, value, created_at, updated_at";

/// SQLite Config Repository
pub struct SqliteConfigRepository {
    pool: DbPool,
}

impl SqliteConfigRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ConfigRow {
    id: i64,
    key: String,
    value: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ConfigRow> for ConfigRecord {
    type Error = RepositoryError;

    fn try_from(row: ConfigRow) -> Result<Self, Self::Error> {
        Ok(ConfigRecord {
            id: row.id,
            key: row.key,
            value: row.value,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl ConfigRepositoryPort for SqliteConfigRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<ConfigRecord>, RepositoryError> {
        let row: Option<ConfigRow> = sqlx::query_as(&format!(
            "SELECT {} FROM configs WHERE key = ?",
            CONFIG_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(ConfigRecord::try_from).transpose()
    }

    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<ConfigRecord>, RepositoryError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM configs WHERE key IN ({}) ORDER BY key",
            CONFIG_COLUMNS,
            in_placeholders(keys.len())
        );
        let mut sql_query = sqlx::query_as::<_, ConfigRow>(&query);
        for key in keys {
            sql_query = sql_query.bind(key);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;
        rows.into_iter().map(ConfigRecord::try_from).collect()
    }

    async fn find_all(&self) -> Result<Vec<ConfigRecord>, RepositoryError> {
        let rows: Vec<ConfigRow> = sqlx::query_as(&format!(
            "SELECT {} FROM configs ORDER BY key",
            CONFIG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(ConfigRecord::try_from).collect()
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<ConfigRecord, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO configs (key, value, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.find_by_key(key)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("config key {}", key)))
    }

    async fn delete_by_key(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM configs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteConfigRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteConfigRepository::new(pool)
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let repo = repo().await;
        let first = repo.upsert("site_title", "A").await.unwrap();
        let second = repo.upsert("site_title", "B").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value.as_deref(), Some("B"));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_keys_subset() {
        let repo = repo().await;
        repo.upsert("a", "1").await.unwrap();
        repo.upsert("b", "2").await.unwrap();

        let keys = vec!["a".to_string(), "missing".to_string()];
        let found = repo.find_by_keys(&keys).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "a");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.upsert("a", "1").await.unwrap();
        repo.delete_by_key("a").await.unwrap();
        assert!(repo.find_by_key("a").await.unwrap().is_none());
    }
}
