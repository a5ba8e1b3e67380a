//! SQLite Comment Repository
//!
//! 关联装配规则与前端约定一致：
//! 后台列表带 user/post，文章页列表带 user/parent_comment

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::post_repo::{PostRow, POST_COLUMNS};
use super::user_repo::{UserRow, USER_COLUMNS};
use super::{in_placeholders, map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, CommentListItem, CommentRecord, CommentRepositoryPort, NewComment,
    PostRecord, RepositoryError, UserRecord,
};

const COMMENT_COLUMNS: &str = "id, username, email, url, user_id, content, post_id, \
     parent_comment_id, created_at, updated_at, is_deleted, deleted_at";

/// SQLite Comment Repository
pub struct SqliteCommentRepository {
    pool: DbPool,
}

impl SqliteCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    username: Option<String>,
    email: Option<String>,
    url: Option<String>,
    user_id: Option<i64>,
    content: String,
    post_id: i64,
    parent_comment_id: Option<i64>,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
}

impl TryFrom<CommentRow> for CommentRecord {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(CommentRecord {
            id: row.id,
            username: row.username,
            email: row.email,
            url: row.url,
            user_id: row.user_id,
            content: row.content,
            post_id: row.post_id,
            parent_comment_id: row.parent_comment_id,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
        })
    }
}

impl SqliteCommentRepository {
    /// 批量查评论作者，返回 user_id -> UserRecord
    async fn load_users(
        &self,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, UserRecord>, RepositoryError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {} FROM users WHERE id IN ({})",
            USER_COLUMNS,
            in_placeholders(user_ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, UserRow>(&query);
        for id in user_ids {
            sql_query = sql_query.bind(*id);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;

        let mut map = HashMap::new();
        for row in rows {
            let user = UserRecord::try_from(row)?;
            map.insert(user.id, user);
        }
        Ok(map)
    }

    /// 批量查所属文章，返回 post_id -> PostRecord
    async fn load_posts(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, PostRecord>, RepositoryError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {} FROM posts WHERE id IN ({})",
            POST_COLUMNS,
            in_placeholders(post_ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, PostRow>(&query);
        for id in post_ids {
            sql_query = sql_query.bind(*id);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;

        let mut map = HashMap::new();
        for row in rows {
            let post = PostRecord::try_from(row)?;
            map.insert(post.id, post);
        }
        Ok(map)
    }

    /// 批量查父评论，返回 id -> CommentRecord
    async fn load_parents(
        &self,
        parent_ids: &[i64],
    ) -> Result<HashMap<i64, CommentRecord>, RepositoryError> {
        if parent_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {} FROM comments WHERE id IN ({})",
            COMMENT_COLUMNS,
            in_placeholders(parent_ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, CommentRow>(&query);
        for id in parent_ids {
            sql_query = sql_query.bind(*id);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;

        let mut map = HashMap::new();
        for row in rows {
            let comment = CommentRecord::try_from(row)?;
            map.insert(comment.id, comment);
        }
        Ok(map)
    }

    fn dedup_ids(ids: impl Iterator<Item = i64>) -> Vec<i64> {
        let mut ids: Vec<i64> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[async_trait]
impl CommentRepositoryPort for SqliteCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO comments (username, email, url, user_id, content, post_id,
                                  parent_comment_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.username)
        .bind(&comment.email)
        .bind(&comment.url)
        .bind(comment.user_id)
        .bind(&comment.content)
        .bind(comment.post_id)
        .bind(comment.parent_comment_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentListItem>, RepositoryError> {
        let Some(comment) = self.find_record(id).await? else {
            return Ok(None);
        };

        let users = match comment.user_id {
            Some(user_id) => self.load_users(&[user_id]).await?,
            None => HashMap::new(),
        };
        let posts = self.load_posts(&[comment.post_id]).await?;
        let parents = match comment.parent_comment_id {
            Some(parent_id) => self.load_parents(&[parent_id]).await?,
            None => HashMap::new(),
        };

        Ok(Some(CommentListItem {
            user: comment.user_id.and_then(|uid| users.get(&uid).cloned()),
            post: posts.get(&comment.post_id).cloned(),
            parent_comment: comment
                .parent_comment_id
                .and_then(|pid| parents.get(&pid).cloned()),
            comment,
        }))
    }

    async fn find_record(&self, id: i64) -> Result<Option<CommentRecord>, RepositoryError> {
        let row: Option<CommentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(CommentRecord::try_from).transpose()
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE is_deleted = 0")
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;

        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM comments WHERE is_deleted = 0 \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            COMMENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let comments = rows
            .into_iter()
            .map(CommentRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let user_ids = Self::dedup_ids(comments.iter().filter_map(|c| c.user_id));
        let post_ids = Self::dedup_ids(comments.iter().map(|c| c.post_id));
        let users = self.load_users(&user_ids).await?;
        let posts = self.load_posts(&post_ids).await?;

        let list = comments
            .into_iter()
            .map(|comment| CommentListItem {
                user: comment.user_id.and_then(|uid| users.get(&uid).cloned()),
                post: posts.get(&comment.post_id).cloned(),
                parent_comment: None,
                comment,
            })
            .collect();

        Ok((list, total.0))
    }

    async fn find_page_by_post(
        &self,
        post_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM comments WHERE is_deleted = 0 AND post_id = ?",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;

        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM comments WHERE is_deleted = 0 AND post_id = ? \
             ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        let comments = rows
            .into_iter()
            .map(CommentRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let user_ids = Self::dedup_ids(comments.iter().filter_map(|c| c.user_id));
        let parent_ids = Self::dedup_ids(comments.iter().filter_map(|c| c.parent_comment_id));
        let users = self.load_users(&user_ids).await?;
        let parents = self.load_parents(&parent_ids).await?;

        let list = comments
            .into_iter()
            .map(|comment| CommentListItem {
                user: comment.user_id.and_then(|uid| users.get(&uid).cloned()),
                post: None,
                parent_comment: comment
                    .parent_comment_id
                    .and_then(|pid| parents.get(&pid).cloned()),
                comment,
            })
            .collect();

        Ok((list, total.0))
    }

    async fn update(&self, comment: &CommentRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE comments
            SET username = ?, email = ?, url = ?, content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&comment.username)
        .bind(&comment.email)
        .bind(&comment.url)
        .bind(&comment.content)
        .bind(Utc::now().to_rfc3339())
        .bind(comment.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE comments SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?",
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
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(total.0)
    }

    async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM comments WHERE is_deleted = 0 AND created_at >= ?",
        )
        .bind(since.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(total.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteCommentRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteCommentRepository::new(pool)
    }

    fn guest_comment(post_id: i64, content: &str) -> NewComment {
        NewComment {
            username: Some("游客".to_string()),
            email: None,
            url: None,
            user_id: None,
            content: content.to_string(),
            post_id,
            parent_comment_id: None,
        }
    }

    #[tokio::test]
    async fn test_post_page_is_ascending_with_parents() {
        let repo = repo().await;
        let first = repo.insert(&guest_comment(1, "沙发")).await.unwrap();

        let mut reply = guest_comment(1, "回复");
        reply.parent_comment_id = Some(first);
        repo.insert(&reply).await.unwrap();

        let (list, total) = repo.find_page_by_post(1, 1, 20).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(list[0].comment.content, "沙发");
        assert_eq!(
            list[1].parent_comment.as_ref().map(|p| p.id),
            Some(first)
        );
        assert!(list[0].post.is_none());
    }

    #[tokio::test]
    async fn test_admin_page_is_descending() {
        let repo = repo().await;
        repo.insert(&guest_comment(1, "第一条")).await.unwrap();
        repo.insert(&guest_comment(2, "第二条")).await.unwrap();

        let (list, total) = repo.find_page(1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(list[0].comment.content, "第二条");
    }

    #[tokio::test]
    async fn test_count_since_excludes_older_rows() {
        let repo = repo().await;
        let id = repo.insert(&guest_comment(1, "老评论")).await.unwrap();
        repo.insert(&guest_comment(1, "新评论")).await.unwrap();

        // 将第一条回拨到 40 天前，模拟上月数据
        let old = (Utc::now() - Duration::days(40)).to_rfc3339();
        sqlx::query("UPDATE comments SET created_at = ? WHERE id = ?")
            .bind(&old)
            .bind(id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let since = Utc::now() - Duration::days(30);
        assert_eq!(repo.count_active().await.unwrap(), 2);
        assert_eq!(repo.count_active_since(since).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repo = repo().await;
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }
}
