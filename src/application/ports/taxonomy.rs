//! Category / Tag Repository Ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepositoryError;

// ============================================================================
// Category
// ============================================================================

/// 分类类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Post,
    Image,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Post => "post",
            CategoryType::Image => "image",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "post" => Some(CategoryType::Post),
            "image" => Some(CategoryType::Image),
            _ => None,
        }
    }
}

impl Default for CategoryType {
    fn default() -> Self {
        CategoryType::Post
    }
}

/// 分类实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// 排序权重，对外字段名为 order
    #[serde(rename = "order")]
    pub sort_order: i64,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 新建分类
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i64,
    pub category_type: CategoryType,
}

/// Category Repository Port
#[async_trait]
pub trait CategoryRepositoryPort: Send + Sync {
    /// 插入分类，返回自增 ID
    async fn insert(&self, category: &NewCategory) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找未删除的分类
    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepositoryError>;

    /// 根据名称查找未删除的分类（查重用）
    async fn find_by_name(&self, name: &str) -> Result<Option<CategoryRecord>, RepositoryError>;

    /// 分页获取分类（sort_order 升序、创建时间倒序），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CategoryRecord>, i64), RepositoryError>;

    /// 获取所有未删除分类（不分页，下拉选择用）
    async fn find_all_list(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;

    /// 更新分类（整行覆盖）
    async fn update(&self, category: &CategoryRecord) -> Result<(), RepositoryError>;

    /// 软删除分类
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 未删除分类总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}

// ============================================================================
// Tag
// ============================================================================

/// 标签实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Tag Repository Port
#[async_trait]
pub trait TagRepositoryPort: Send + Sync {
    /// 插入标签，返回自增 ID
    async fn insert(&self, name: &str) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找未删除的标签
    async fn find_by_id(&self, id: i64) -> Result<Option<TagRecord>, RepositoryError>;

    /// 根据名称查找未删除的标签（查重用）
    async fn find_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepositoryError>;

    /// 批量查找未删除的标签（文章关联用）
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TagRecord>, RepositoryError>;

    /// 分页获取标签（按创建时间倒序），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<TagRecord>, i64), RepositoryError>;

    /// 获取所有未删除标签（不分页，下拉选择用）
    async fn find_all_list(&self) -> Result<Vec<TagRecord>, RepositoryError>;

    /// 更新标签（整行覆盖）
    async fn update(&self, tag: &TagRecord) -> Result<(), RepositoryError>;

    /// 软删除标签
    async fn soft_delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 未删除标签总数
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}
