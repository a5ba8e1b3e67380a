//! Image Repository Port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RepositoryError;

/// 图片实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub size: i64,
    pub mime_type: Option<String>,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 新建图片记录
#[derive(Debug, Clone)]
pub struct NewImage {
    pub name: String,
    pub url: String,
    pub size: i64,
    pub mime_type: Option<String>,
    pub category_id: Option<i64>,
}

/// 图片列表的分类过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategoryFilter {
    /// 不过滤
    All,
    /// 仅未分类（category_id IS NULL）
    Uncategorized,
    /// 指定分类
    Category(i64),
}

/// Image Repository Port
#[async_trait]
pub trait ImageRepositoryPort: Send + Sync {
    /// 插入图片记录，返回自增 ID
    async fn insert(&self, image: &NewImage) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找未删除的图片
    async fn find_by_id(&self, id: i64) -> Result<Option<ImageRecord>, RepositoryError>;

    /// 分页获取未删除图片（按创建时间倒序，可按分类过滤），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        filter: ImageCategoryFilter,
    ) -> Result<(Vec<ImageRecord>, i64), RepositoryError>;

    /// 更新图片记录（整行覆盖）
    async fn update(&self, image: &ImageRecord) -> Result<(), RepositoryError>;

    /// 软删除图片
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 批量软删除图片
    async fn soft_delete_many(&self, ids: &[i64]) -> Result<(), RepositoryError>;

    /// 未删除图片总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}
