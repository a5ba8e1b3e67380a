//! Link Repository Port
//!
//! 友情链接

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RepositoryError;

/// 友情链接实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    /// 排序权重，对外字段名为 order
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 新建友情链接
#[derive(Debug, Clone)]
pub struct NewLink {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub sort_order: i64,
}

/// Link Repository Port
#[async_trait]
pub trait LinkRepositoryPort: Send + Sync {
    /// 插入友情链接，返回自增 ID
    async fn insert(&self, link: &NewLink) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找未删除的友情链接
    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, RepositoryError>;

    /// 分页获取友情链接（sort_order 升序、创建时间倒序），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<LinkRecord>, i64), RepositoryError>;

    /// 获取所有未删除友情链接（不分页，前台展示用）
    async fn find_all_list(&self) -> Result<Vec<LinkRecord>, RepositoryError>;

    /// 更新友情链接（整行覆盖）
    async fn update(&self, link: &LinkRecord) -> Result<(), RepositoryError>;

    /// 软删除友情链接
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 未删除友情链接总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}
