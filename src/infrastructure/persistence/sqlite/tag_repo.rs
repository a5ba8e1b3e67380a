//! SQLite Tag Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{in_placeholders, map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, RepositoryError, TagRecord, TagRepositoryPort,
};

const TAG_COLUMNS: &str = "id, name, created_at, updated_at, is_deleted, deleted_at";

/// SQLite Tag Repository
pub struct SqliteTagRepository {
    pool: DbPool,
}

impl SqliteTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TagRow {
    id: i64,
    name: String,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
}

impl TryFrom<TagRow> for TagRecord {
    type Error = RepositoryError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(TagRecord {
            id: row.id,
            name: row.name,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
        })
    }
}

#[async_trait]
impl TagRepositoryPort for SqliteTagRepository {
    async fn insert(&self, name: &str) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO tags (name, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TagRecord>, RepositoryError> {
        let row: Option<TagRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tags WHERE id = ? AND is_deleted = 0",
            TAG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(TagRecord::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepositoryError> {
        let row: Option<TagRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tags WHERE name = ? AND is_deleted = 0",
            TAG_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(TagRecord::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TagRecord>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM tags WHERE is_deleted = 0 AND id IN ({}) ORDER BY id",
            TAG_COLUMNS,
            in_placeholders(ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, TagRow>(&query);
        for id in ids {
            sql_query = sql_query.bind(*id);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;
        rows.into_iter().map(TagRecord::try_from).collect()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<TagRecord>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;

        let rows: Vec<TagRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tags WHERE is_deleted = 0 \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            TAG_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let list = rows
            .into_iter()
            .map(TagRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((list, total.0))
    }

    async fn find_all_list(&self) -> Result<Vec<TagRecord>, RepositoryError> {
        let rows: Vec<TagRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tags WHERE is_deleted = 0 ORDER BY created_at DESC, id DESC",
            TAG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(TagRecord::try_from).collect()
    }

    async fn update(&self, tag: &TagRecord) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE tags SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&tag.name)
            .bind(Utc::now().to_rfc3339())
            .bind(tag.id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE tags SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(total.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteTagRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTagRepository::new(pool)
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_deleted_and_missing() {
        let repo = repo().await;
        let rust = repo.insert("rust").await.unwrap();
        let tokio_tag = repo.insert("tokio").await.unwrap();
        repo.soft_delete(tokio_tag).await.unwrap();

        let found = repo.find_by_ids(&[rust, tokio_tag, 999]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "rust");

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_and_count() {
        let repo = repo().await;
        for name in ["a", "b", "c"] {
            repo.insert(name).await.unwrap();
        }

        let (list, total) = repo.find_page(1, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(list.len(), 2);
        assert_eq!(repo.count_active().await.unwrap(), 3);
    }
}
