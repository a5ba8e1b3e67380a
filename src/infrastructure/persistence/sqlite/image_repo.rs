//! SQLite Image Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{in_placeholders, map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, ImageCategoryFilter, ImageRecord, ImageRepositoryPort, NewImage,
    RepositoryError,
};

const IMAGE_COLUMNS: &str = "id, name, url, size, mime_type, category_id, \
     created_at, updated_at, is_deleted, deleted_at";

/// SQLite Image Repository
pub struct SqliteImageRepository {
    pool: DbPool,
}

impl SqliteImageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ImageRow {
    id: i64,
    name: String,
    url: String,
    size: i64,
    mime_type: Option<String>,
    category_id: Option<i64>,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
}

impl TryFrom<ImageRow> for ImageRecord {
    type Error = RepositoryError;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        Ok(ImageRecord {
            id: row.id,
            name: row.name,
            url: row.url,
            size: row.size,
            mime_type: row.mime_type,
            category_id: row.category_id,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
        })
    }
}

#[async_trait]
impl ImageRepositoryPort for SqliteImageRepository {
    async fn insert(&self, image: &NewImage) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO images (name, url, size, mime_type, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.name)
        .bind(&image.url)
        .bind(image.size)
        .bind(&image.mime_type)
        .bind(image.category_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ImageRecord>, RepositoryError> {
        let row: Option<ImageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM images WHERE id = ? AND is_deleted = 0",
            IMAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(ImageRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        filter: ImageCategoryFilter,
    ) -> Result<(Vec<ImageRecord>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let condition = match filter {
            ImageCategoryFilter::All => "",
            ImageCategoryFilter::Uncategorized => " AND category_id IS NULL",
            ImageCategoryFilter::Category(_) => " AND category_id = ?",
        };

        let count_query = format!(
            "SELECT COUNT(*) FROM images WHERE is_deleted = 0{}",
            condition
        );
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        if let ImageCategoryFilter::Category(id) = filter {
            count = count.bind(id);
        }
        let total = count.fetch_one(&self.pool).await.map_err(map_db_err)?;

        let page_query = format!(
            "SELECT {} FROM images WHERE is_deleted = 0{} \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            IMAGE_COLUMNS, condition
        );
        let mut rows = sqlx::query_as::<_, ImageRow>(&page_query);
        if let ImageCategoryFilter::Category(id) = filter {
            rows = rows.bind(id);
        }
        let rows = rows
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        let list = rows
            .into_iter()
            .map(ImageRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((list, total.0))
    }

    async fn update(&self, image: &ImageRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE images
            SET name = ?, url = ?, size = ?, mime_type = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&image.name)
        .bind(&image.url)
        .bind(image.size)
        .bind(&image.mime_type)
        .bind(image.category_id)
        .bind(Utc::now().to_rfc3339())
        .bind(image.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE images SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete_many(&self, ids: &[i64]) -> Result<(), RepositoryError> {
        if ids.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let query = format!(
            "UPDATE images SET is_deleted = 1, deleted_at = ?, updated_at = ? \
             WHERE is_deleted = 0 AND id IN ({})",
            in_placeholders(ids.len())
        );
        let mut sql_query = sqlx::query(&query).bind(&now).bind(&now);
        for id in ids {
            sql_query = sql_query.bind(*id);
        }

        sql_query.execute(&self.pool).await.map_err(map_db_err)?;
        Ok(())
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM images WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(total.0)
    }
}
