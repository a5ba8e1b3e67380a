//! SQLite Link Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, LinkRecord, LinkRepositoryPort, NewLink, RepositoryError,
};

const LINK_COLUMNS: &str = "id, name, url, icon, description, sort_order, \
     created_at, updated_at, is_deleted, deleted_at";

/// SQLite Link Repository
pub struct SqliteLinkRepository {
    pool: DbPool,
}

impl SqliteLinkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    name: String,
    url: String,
    icon: Option<String>,
    description: Option<String>,
    sort_order: i64,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
}

impl TryFrom<LinkRow> for LinkRecord {
    type Error = RepositoryError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        Ok(LinkRecord {
            id: row.id,
            name: row.name,
            url: row.url,
            icon: row.icon,
            description: row.description,
            sort_order: row.sort_order,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
        })
    }
}

#[async_trait]
impl LinkRepositoryPort for SqliteLinkRepository {
    async fn insert(&self, link: &NewLink) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO links (name, url, icon, description, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.name)
        .bind(&link.url)
        .bind(&link.icon)
        .bind(&link.description)
        .bind(link.sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, RepositoryError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM links WHERE id = ? AND is_deleted = 0",
            LINK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(LinkRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<LinkRecord>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;

        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM links WHERE is_deleted = 0 \
             ORDER BY sort_order ASC, created_at DESC, id DESC LIMIT ? OFFSET ?",
            LINK_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let list = rows
            .into_iter()
            .map(LinkRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((list, total.0))
    }

    async fn find_all_list(&self) -> Result<Vec<LinkRecord>, RepositoryError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {} FROM links WHERE is_deleted = 0 \
             ORDER BY sort_order ASC, created_at DESC, id DESC",
            LINK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(LinkRecord::try_from).collect()
    }

    async fn update(&self, link: &LinkRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE links
            SET name = ?, url = ?, icon = ?, description = ?, sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&link.name)
        .bind(&link.url)
        .bind(&link.icon)
        .bind(&link.description)
        .bind(link.sort_order)
        .bind(Utc::now().to_rfc3339())
        .bind(link.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE links SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(total.0)
    }
}
