//! SQLite Post Repository
//!
//! 列表查询批量装配作者/标签/评论数，避免逐行回表

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

use super::user_repo::{UserRow, USER_COLUMNS};
use super::{in_placeholders, map_db_err, parse_datetime, parse_datetime_opt, DbPool};
use crate::application::ports::{
    page_to_offset, NewPost, PostDetail, PostListItem, PostRecord, PostRepositoryPort,
    RepositoryError, TagRecord, UserRecord,
};

pub(crate) const POST_COLUMNS: &str = "id, title, content, cover, author_id, description, \
     category_id, created_at, updated_at, is_deleted, deleted_at, views, likes, \
     type AS post_type, page_type";

/// SQLite Post Repository
pub struct SqlitePostRepository {
    pool: DbPool,
}

impl SqlitePostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
pub(crate) struct PostRow {
    id: i64,
    title: String,
    content: Option<String>,
    cover: Option<String>,
    author_id: i64,
    description: Option<String>,
    category_id: i64,
    created_at: String,
    updated_at: String,
    is_deleted: i64,
    deleted_at: Option<String>,
    views: i64,
    likes: i64,
    post_type: i64,
    page_type: Option<String>,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = RepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(PostRecord {
            id: row.id,
            title: row.title,
            content: row.content,
            cover: row.cover,
            author_id: row.author_id,
            description: row.description,
            category_id: row.category_id,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            is_deleted: row.is_deleted != 0,
            deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
            views: row.views,
            likes: row.likes,
            post_type: row.post_type,
            page_type: row.page_type,
        })
    }
}

/// 分页行：文章 + 评论数
#[derive(FromRow)]
struct PostPageRow {
    #[sqlx(flatten)]
    post: PostRow,
    comment_count: i64,
}

impl SqlitePostRepository {
    /// 批量查作者，返回 author_id -> UserRecord
    async fn load_authors(
        &self,
        author_ids: &[i64],
    ) -> Result<HashMap<i64, UserRecord>, RepositoryError> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {} FROM users WHERE id IN ({})",
            USER_COLUMNS,
            in_placeholders(author_ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, UserRow>(&query);
        for id in author_ids {
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

    /// 批量查标签，返回 post_id -> Vec<TagRecord>
    async fn load_tags(
        &self,
        post_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<TagRecord>>, RepositoryError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(FromRow)]
        struct TaggedRow {
            post_id: i64,
            id: i64,
            name: String,
            created_at: String,
            updated_at: String,
            is_deleted: i64,
            deleted_at: Option<String>,
        }

        let query = format!(
            "SELECT pt.post_id, t.id, t.name, t.created_at, t.updated_at, t.is_deleted, t.deleted_at \
             FROM post_tags pt \
             JOIN tags t ON t.id = pt.tag_id AND t.is_deleted = 0 \
             WHERE pt.post_id IN ({}) \
             ORDER BY t.id",
            in_placeholders(post_ids.len())
        );
        let mut sql_query = sqlx::query_as::<_, TaggedRow>(&query);
        for id in post_ids {
            sql_query = sql_query.bind(*id);
        }

        let rows = sql_query.fetch_all(&self.pool).await.map_err(map_db_err)?;

        let mut map: HashMap<i64, Vec<TagRecord>> = HashMap::new();
        for row in rows {
            let tag = TagRecord {
                id: row.id,
                name: row.name,
                created_at: parse_datetime(&row.created_at)?,
                updated_at: parse_datetime(&row.updated_at)?,
                is_deleted: row.is_deleted != 0,
                deleted_at: parse_datetime_opt(row.deleted_at.as_deref())?,
            };
            map.entry(row.post_id).or_default().push(tag);
        }
        Ok(map)
    }

    /// 将分页行装配为列表项
    async fn assemble_page(
        &self,
        rows: Vec<PostPageRow>,
    ) -> Result<Vec<PostListItem>, RepositoryError> {
        let post_ids: Vec<i64> = rows.iter().map(|r| r.post.id).collect();
        let author_ids: Vec<i64> = {
            let mut ids: Vec<i64> = rows.iter().map(|r| r.post.author_id).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let authors = self.load_authors(&author_ids).await?;
        let mut tags = self.load_tags(&post_ids).await?;

        rows.into_iter()
            .map(|row| {
                let comment_count = row.comment_count;
                let post = PostRecord::try_from(row.post)?;
                let author = authors.get(&post.author_id).cloned();
                let post_tags = tags.remove(&post.id).unwrap_or_default();
                Ok(PostListItem {
                    author,
                    tags: post_tags,
                    comment_count,
                    post,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepositoryPort for SqlitePostRepository {
    async fn insert(&self, post: &NewPost) -> Result<i64, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO posts (title, content, cover, author_id, description, category_id,
                               created_at, updated_at, type, page_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.cover)
        .bind(post.author_id)
        .bind(&post.description)
        .bind(post.category_id)
        .bind(&now)
        .bind(&now)
        .bind(post.post_type)
        .bind(&post.page_type)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepositoryError> {
        let row: Option<PostRow> = sqlx::query_as(&format!(
            "SELECT {} FROM posts WHERE id = ? AND is_deleted = 0",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn find_detail(&self, id: i64) -> Result<Option<PostDetail>, RepositoryError> {
        let Some(post) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let authors = self.load_authors(&[post.author_id]).await?;
        let mut tags = self.load_tags(&[post.id]).await?;

        Ok(Some(PostDetail {
            author: authors.get(&post.author_id).cloned(),
            tags: tags.remove(&post.id).unwrap_or_default(),
            post,
        }))
    }

    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        post_type: Option<i64>,
    ) -> Result<(Vec<PostListItem>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let (total, rows): ((i64,), Vec<PostPageRow>) = match post_type {
            Some(post_type) => {
                let total = sqlx::query_as(
                    "SELECT COUNT(*) FROM posts WHERE is_deleted = 0 AND type = ?",
                )
                .bind(post_type)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;

                let rows = sqlx::query_as(&format!(
                    "SELECT {}, (SELECT COUNT(*) FROM comments c \
                         WHERE c.post_id = posts.id AND c.is_deleted = 0) AS comment_count \
                     FROM posts WHERE is_deleted = 0 AND type = ? \
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                    POST_COLUMNS
                ))
                .bind(post_type)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;

                (total, rows)
            }
            None => {
                let total = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE is_deleted = 0")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_err)?;

                let rows = sqlx::query_as(&format!(
                    "SELECT {}, (SELECT COUNT(*) FROM comments c \
                         WHERE c.post_id = posts.id AND c.is_deleted = 0) AS comment_count \
                     FROM posts WHERE is_deleted = 0 \
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                    POST_COLUMNS
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;

                (total, rows)
            }
        };

        Ok((self.assemble_page(rows).await?, total.0))
    }

    async fn find_page_by_author(
        &self,
        author_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<PostListItem>, i64), RepositoryError> {
        let (offset, limit) = page_to_offset(page, page_size);

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM posts WHERE is_deleted = 0 AND author_id = ?")
                .bind(author_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;

        let rows: Vec<PostPageRow> = sqlx::query_as(&format!(
            "SELECT {}, (SELECT COUNT(*) FROM comments c \
                 WHERE c.post_id = posts.id AND c.is_deleted = 0) AS comment_count \
             FROM posts WHERE is_deleted = 0 AND author_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            POST_COLUMNS
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok((self.assemble_page(rows).await?, total.0))
    }

    async fn update(&self, post: &PostRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = ?, content = ?, cover = ?, author_id = ?, description = ?,
                category_id = ?, type = ?, page_type = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.cover)
        .bind(post.author_id)
        .bind(&post.description)
        .bind(post.category_id)
        .bind(post.post_type)
        .bind(&post.page_type)
        .bind(Utc::now().to_rfc3339())
        .bind(post.id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepositoryError> {
        // 使用事务保证替换的原子性
        let mut tx = self.pool.begin().await.map_err(map_db_err)?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err)?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(*tag_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err)?;
        }

        tx.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE posts SET is_deleted = 1, deleted_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn increment_views(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE posts SET views = views + 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn increment_likes(&self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE posts SET likes = likes + 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE is_deleted = 0")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(total.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{NewComment, NewUser, CommentRepositoryPort, TagRepositoryPort, UserRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteCommentRepository, SqliteTagRepository,
        SqliteUserRepository,
    };

    struct Fixture {
        posts: SqlitePostRepository,
        users: SqliteUserRepository,
        tags: SqliteTagRepository,
        comments: SqliteCommentRepository,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        Fixture {
            posts: SqlitePostRepository::new(pool.clone()),
            users: SqliteUserRepository::new(pool.clone()),
            tags: SqliteTagRepository::new(pool.clone()),
            comments: SqliteCommentRepository::new(pool),
        }
    }

    fn new_post(author_id: i64, title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: Some("正文".to_string()),
            cover: None,
            author_id,
            description: None,
            category_id: 1,
            post_type: 0,
            page_type: None,
        }
    }

    async fn seed_author(fixture: &Fixture) -> i64 {
        fixture
            .users
            .insert(&NewUser {
                username: "author".to_string(),
                email: "author@example.com".to_string(),
                password: "hash".to_string(),
                nickname: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_detail_includes_author_and_tags() {
        let fixture = fixture().await;
        let author_id = seed_author(&fixture).await;
        let post_id = fixture
            .posts
            .insert(&new_post(author_id, "第一篇"))
            .await
            .unwrap();
        let tag_id = fixture.tags.insert("rust").await.unwrap();
        fixture.posts.set_tags(post_id, &[tag_id]).await.unwrap();

        let detail = fixture.posts.find_detail(post_id).await.unwrap().unwrap();
        assert_eq!(detail.author.unwrap().username, "author");
        assert_eq!(detail.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_page_counts_live_comments_only() {
        let fixture = fixture().await;
        let author_id = seed_author(&fixture).await;
        let post_id = fixture
            .posts
            .insert(&new_post(author_id, "第一篇"))
            .await
            .unwrap();

        for content in ["沙发", "板凳"] {
            fixture
                .comments
                .insert(&NewComment {
                    username: Some("游客".to_string()),
                    email: None,
                    url: None,
                    user_id: None,
                    content: content.to_string(),
                    post_id,
                    parent_comment_id: None,
                })
                .await
                .unwrap();
        }
        // 软删一条，评论数应只计活跃评论
        let (list, _) = fixture.comments.find_page_by_post(post_id, 1, 20).await.unwrap();
        fixture
            .comments
            .soft_delete(list[0].comment.id)
            .await
            .unwrap();

        let (page, total) = fixture.posts.find_page(1, 10, None).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].comment_count, 1);
    }

    #[tokio::test]
    async fn test_set_tags_replaces_existing() {
        let fixture = fixture().await;
        let author_id = seed_author(&fixture).await;
        let post_id = fixture
            .posts
            .insert(&new_post(author_id, "第一篇"))
            .await
            .unwrap();
        let rust = fixture.tags.insert("rust").await.unwrap();
        let tokio_tag = fixture.tags.insert("tokio").await.unwrap();

        fixture.posts.set_tags(post_id, &[rust]).await.unwrap();
        fixture.posts.set_tags(post_id, &[tokio_tag]).await.unwrap();

        let detail = fixture.posts.find_detail(post_id).await.unwrap().unwrap();
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.tags[0].name, "tokio");
    }

    #[tokio::test]
    async fn test_soft_delete_excluded_from_count() {
        let fixture = fixture().await;
        let author_id = seed_author(&fixture).await;
        let post_id = fixture
            .posts
            .insert(&new_post(author_id, "第一篇"))
            .await
            .unwrap();
        assert_eq!(fixture.posts.count_active().await.unwrap(), 1);

        fixture.posts.soft_delete(post_id).await.unwrap();
        assert_eq!(fixture.posts.count_active().await.unwrap(), 0);
        assert!(fixture.posts.find_by_id(post_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_author_filter() {
        let fixture = fixture().await;
        let author_id = seed_author(&fixture).await;
        let other_id = fixture
            .users
            .insert(&NewUser {
                username: "other".to_string(),
                email: "other@example.com".to_string(),
                password: "hash".to_string(),
                nickname: None,
            })
            .await
            .unwrap();

        fixture.posts.insert(&new_post(author_id, "甲")).await.unwrap();
        fixture.posts.insert(&new_post(other_id, "乙")).await.unwrap();

        let (list, total) = fixture
            .posts
            .find_page_by_author(author_id, 1, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].post.title, "甲");
    }
}
