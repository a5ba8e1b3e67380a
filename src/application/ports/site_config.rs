//! Site Config Repository Port
//!
//! 站点配置：键值对存储（site_title、site_footer 等）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RepositoryError;

/// 配置项实体（用于持久化）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Config Repository Port
#[async_trait]
pub trait ConfigRepositoryPort: Send + Sync {
    /// 根据键查找配置项
    async fn find_by_key(&self, key: &str) -> Result<Option<ConfigRecord>, RepositoryError>;

    /// 批量查找配置项
    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<ConfigRecord>, RepositoryError>;

    /// 获取所有配置项
    async fn find_all(&self) -> Result<Vec<ConfigRecord>, RepositoryError>;

    /// 写入配置项（存在则更新，否则插入），返回最新记录
    async fn upsert(&self, key: &str, value: &str) -> Result<ConfigRecord, RepositoryError>;

    /// 根据键删除配置项（物理删除）
    async fn delete_by_key(&self, key: &str) -> Result<(), RepositoryError>;
}
