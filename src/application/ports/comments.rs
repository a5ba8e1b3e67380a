//! Comment Repository Port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{PostRecord, RepositoryError, UserRecord};

/// 评论实体（用于持久化）
///
/// 游客评论填 username/email/url，登录用户评论填 user_id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub user_id: Option<i64>,
    pub content: String,
    pub post_id: i64,
    pub parent_comment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 新建评论
#[derive(Debug, Clone)]
pub struct NewComment {
    pub username: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub user_id: Option<i64>,
    pub content: String,
    pub post_id: i64,
    pub parent_comment_id: Option<i64>,
}

/// 评论列表项（按查询场景填充关联：后台列表带 post，文章页带 parent_comment）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListItem {
    #[serde(flatten)]
    pub comment: CommentRecord,
    pub user: Option<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment: Option<CommentRecord>,
}

/// Comment Repository Port
#[async_trait]
pub trait CommentRepositoryPort: Send + Sync {
    /// 插入评论，返回自增 ID
    async fn insert(&self, comment: &NewComment) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找评论（不过滤删除标记，含 user/post/parent 关联）
    async fn find_by_id(&self, id: i64) -> Result<Option<CommentListItem>, RepositoryError>;

    /// 根据 ID 查找评论（仅本体）
    async fn find_record(&self, id: i64) -> Result<Option<CommentRecord>, RepositoryError>;

    /// 分页获取未删除评论（按创建时间倒序，含 user/post），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), RepositoryError>;

    /// 分页获取某文章的未删除评论（按创建时间升序，含 user/parent），返回 (列表, 总数)
    async fn find_page_by_post(
        &self,
        post_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), RepositoryError>;

    /// 更新评论（整行覆盖）
    async fn update(&self, comment: &CommentRecord) -> Result<(), RepositoryError>;

    /// 软删除评论
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 未删除评论总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;

    /// 指定时间之后创建的未删除评论数（本月统计用）
    async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, RepositoryError>;
}
