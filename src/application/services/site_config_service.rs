//! 站点配置服务
//!
//! 键值对配置（站点标题、页脚等），启动时补齐缺失的默认项

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ConfigRecord, ConfigRepositoryPort};

/// 默认配置项
const DEFAULT_CONFIGS: &[(&str, &str)] = &[
    ("site_title", "Emolog"),
    ("site_description", "一个简洁的博客系统"),
    ("site_icon", ""),
    ("site_logo", ""),
    ("site_keywords", "博客,技术,分享"),
    ("site_footer", "© 2025 Emolog. All rights reserved."),
];

/// 站点配置服务
pub struct SiteConfigService {
    configs: Arc<dyn ConfigRepositoryPort>,
}

impl SiteConfigService {
    pub fn new(configs: Arc<dyn ConfigRepositoryPort>) -> Self {
        Self { configs }
    }

    /// 初始化默认配置项（仅补齐缺失的键，不覆盖已有值）
    pub async fn seed_defaults(&self) -> Result<(), ApplicationError> {
        for (key, value) in DEFAULT_CONFIGS {
            if self.configs.find_by_key(key).await?.is_none() {
                self.configs.upsert(key, value).await?;
            }
        }
        Ok(())
    }

    /// 获取单个配置值
    pub async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        Ok(self
            .configs
            .find_by_key(key)
            .await?
            .and_then(|record| record.value))
    }

    /// 获取多个配置，返回 key -> value 映射
    pub async fn get_many(
        &self,
        keys: &[String],
    ) -> Result<BTreeMap<String, String>, ApplicationError> {
        let records = self.configs.find_by_keys(keys).await?;
        Ok(records
            .into_iter()
            .map(|record| (record.key, record.value.unwrap_or_default()))
            .collect())
    }

    /// 获取所有配置，返回 key -> value 映射
    pub async fn get_all(&self) -> Result<BTreeMap<String, String>, ApplicationError> {
        let records = self.configs.find_all().await?;
        Ok(records
            .into_iter()
            .map(|record| (record.key, record.value.unwrap_or_default()))
            .collect())
    }

    /// 设置单个配置
    pub async fn set(&self, key: &str, value: &str) -> Result<ConfigRecord, ApplicationError> {
        Ok(self.configs.upsert(key, value).await?)
    }

    /// 批量设置配置，返回设置后的全量映射
    pub async fn set_many(
        &self,
        entries: &[(String, String)],
    ) -> Result<BTreeMap<String, String>, ApplicationError> {
        for (key, value) in entries {
            self.configs.upsert(key, value).await?;
        }
        self.get_all().await
    }

    /// 删除配置
    pub async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.configs.delete_by_key(key).await?;
        Ok(())
    }
}
