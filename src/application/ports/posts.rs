//! Post Repository Port
//!
//! 文章与页面共用 posts 表：type = 0 为文章，type = 1 为页面（page_type 细分）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RepositoryError, TagRecord, UserRecord};

/// 文章实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub author_id: i64,
    pub description: Option<String>,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub views: i64,
    pub likes: i64,
    #[serde(rename = "type")]
    pub post_type: i64,
    pub page_type: Option<String>,
}

/// 新建文章
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub author_id: i64,
    pub description: Option<String>,
    pub category_id: i64,
    pub post_type: i64,
    pub page_type: Option<String>,
}

/// 文章详情（含作者与标签）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostRecord,
    pub author: Option<UserRecord>,
    pub tags: Vec<TagRecord>,
}

/// 列表项（详情 + 评论数，不含全文评论）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    #[serde(flatten)]
    pub post: PostRecord,
    pub author: Option<UserRecord>,
    pub tags: Vec<TagRecord>,
    /// 未删除评论数
    pub comment_count: i64,
}

/// Post Repository Port
#[async_trait]
pub trait PostRepositoryPort: Send + Sync {
    /// 插入文章，返回自增 ID
    async fn insert(&self, post: &NewPost) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找未删除的文章（不含关联）
    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepositoryError>;

    /// 根据 ID 查找未删除的文章详情（含作者、标签）
    async fn find_detail(&self, id: i64) -> Result<Option<PostDetail>, RepositoryError>;

    /// 分页获取未删除文章（按创建时间倒序，可按 type 过滤），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        post_type: Option<i64>,
    ) -> Result<(Vec<PostListItem>, i64), RepositoryError>;

    /// 分页获取作者的未删除文章，返回 (列表, 总数)
    async fn find_page_by_author(
        &self,
        author_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<PostListItem>, i64), RepositoryError>;

    /// 更新文章（整行覆盖，不含标签关联）
    async fn update(&self, post: &PostRecord) -> Result<(), RepositoryError>;

    /// 替换文章的标签关联
    async fn set_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<(), RepositoryError>;

    /// 软删除文章
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 浏览量 +1
    async fn increment_views(&self, id: i64) -> Result<(), RepositoryError>;

    /// 点赞数 +1
    async fn increment_likes(&self, id: i64) -> Result<(), RepositoryError>;

    /// 未删除文章总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}
