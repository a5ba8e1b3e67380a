//! SQLite Category Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::{map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, CategoryRecord, CategoryRepositoryPort, CategoryType, NewCategory,
    RepositoryError,
};

const CATEGORY_COLUMNS: &str =
    "id, name, description, icon, sort_order, type AS category_type, \
     created_at, updated_at, is_deleted, deleted_at";

/// SQLite Category Repository
pub struct SqliteCategoryRepository {
    pool: DbPool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    sort_order: i64,
    category_type: String,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
}

impl TryFrom<CategoryRow> for CategoryRecord {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(CategoryRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            sort_order: row.sort_order,
            category_type: CategoryType::from_str(&row.category_type).unwrap_or_default(),
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
        })
    }
}

#[async_trait]
impl CategoryRepositoryPort for SqliteCategoryRepository {
    async fn insert(&self, category: &NewCategory) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, icon, sort_order, type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .bind(category.sort_order)
        .bind(category.category_type.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE id = ? AND is_deleted = 0",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(CategoryRecord::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE name = ? AND is_deleted = 0",
            CATEGORY_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(CategoryRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CategoryRecord>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE is_deleted = 0")
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;

        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE is_deleted = 0 \
             ORDER BY sort_order ASC, created_at DESC, id DESC LIMIT ? OFFSET ?",
            CATEGORY_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let list = rows
            .into_iter()
            .map(CategoryRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((list, total.0))
    }

    async fn find_all_list(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {} FROM categories WHERE is_deleted = 0 \
             ORDER BY sort_order ASC, created_at DESC, id DESC",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(CategoryRecord::try_from).collect()
    }

    async fn update(&self, category: &CategoryRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, description = ?, icon = ?, sort_order = ?, type = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .bind(category.sort_order)
        .bind(category.category_type.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(category.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE categories SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?",
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
        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM categories WHERE is_deleted = 0")
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

    async fn repo() -> SqliteCategoryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteCategoryRepository::new(pool)
    }

    fn new_category(name: &str, order: i64) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            description: None,
            icon: None,
            sort_order: order,
            category_type: CategoryType::Post,
        }
    }

    #[tokio::test]
    async fn test_insert_find_by_name() {
        let repo = repo().await;
        repo.insert(&new_category("技术", 0)).await.unwrap();

        let found = repo.find_by_name("技术").await.unwrap().unwrap();
        assert_eq!(found.category_type, CategoryType::Post);
        assert!(repo.find_by_name("生活").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_respects_sort_order() {
        let repo = repo().await;
        repo.insert(&new_category("乙", 2)).await.unwrap();
        repo.insert(&new_category("甲", 1)).await.unwrap();

        let list = repo.find_all_list().await.unwrap();
        assert_eq!(list[0].name, "甲");
        assert_eq!(list[1].name, "乙");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_queries() {
        let repo = repo().await;
        let id = repo.insert(&new_category("技术", 0)).await.unwrap();
        repo.soft_delete(id).await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(repo.find_by_name("技术").await.unwrap().is_none());
        assert_eq!(repo.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_duplicate_error() {
        let repo = repo().await;
        repo.insert(&new_category("技术", 0)).await.unwrap();
        let err = repo.insert(&new_category("技术", 1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(_)));
    }
}
