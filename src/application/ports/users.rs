//! User Repository Port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RepositoryError;

/// 个人主页外链（存储为 JSON 列）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileLink {
    pub order: i64,
    pub icon: String,
    pub name: String,
    pub url: String,
}

/// 用户实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 哈希，绝不序列化
    #[serde(skip_serializing)]
    pub password: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub profile_background: Option<String>,
    pub bio: Option<String>,
    pub links: Option<Vec<ProfileLink>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建用户
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// 已哈希的密码
    pub password: String,
    pub nickname: Option<String>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 插入用户，返回自增 ID
    async fn insert(&self, user: &NewUser) -> Result<i64, RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据用户名或邮箱查找用户（登录用）
    async fn find_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<UserRecord>, RepositoryError>;

    /// 分页获取用户（按创建时间倒序），返回 (列表, 总数)
    async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<UserRecord>, i64), RepositoryError>;

    /// 更新用户（整行覆盖）
    async fn update(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 删除用户（物理删除）
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// 获取博主（最近活跃的启用用户）
    async fn find_owner(&self) -> Result<Option<UserRecord>, RepositoryError>;
}
