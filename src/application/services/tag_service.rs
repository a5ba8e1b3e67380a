//! 标签服务

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{TagRecord, TagRepositoryPort};

/// 标签统计
#[derive(Debug, Clone, Serialize)]
pub struct TagStats {
    pub total: i64,
}

/// 标签服务
pub struct TagService {
    tags: Arc<dyn TagRepositoryPort>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepositoryPort>) -> Self {
        Self { tags }
    }

    /// 创建标签
    pub async fn create(&self, name: &str) -> Result<TagRecord, ApplicationError> {
        if name.trim().is_empty() {
            return Err(ApplicationError::bad_request("标签名称不能为空"));
        }

        // 检查标签名是否已存在
        if self.tags.find_by_name(name).await?.is_some() {
            return Err(ApplicationError::DuplicateName("标签名称已存在".to_string()));
        }

        let id = self.tags.insert(name).await?;
        self.find_by_id(id).await
    }

    /// 获取标签列表（分页）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<TagRecord>, i64), ApplicationError> {
        Ok(self.tags.find_page(page, page_size).await?)
    }

    /// 获取所有标签（不分页，用于下拉选择）
    pub async fn find_all_list(&self) -> Result<Vec<TagRecord>, ApplicationError> {
        Ok(self.tags.find_all_list().await?)
    }

    /// 获取标签详情
    pub async fn find_by_id(&self, id: i64) -> Result<TagRecord, ApplicationError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("标签"))
    }

    /// 更新标签
    pub async fn update(&self, id: i64, name: Option<String>) -> Result<TagRecord, ApplicationError> {
        let mut tag = self.find_by_id(id).await?;

        if let Some(name) = name {
            if name != tag.name && self.tags.find_by_name(&name).await?.is_some() {
                return Err(ApplicationError::DuplicateName("标签名称已存在".to_string()));
            }
            tag.name = name;
        }

        self.tags.update(&tag).await?;
        self.find_by_id(id).await
    }

    /// 软删除标签
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.find_by_id(id).await?;
        self.tags.soft_delete(id).await?;
        Ok(())
    }

    /// 获取标签统计信息
    pub async fn stats(&self) -> Result<TagStats, ApplicationError> {
        Ok(TagStats {
            total: self.tags.count_active().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{test_ports, TestPorts};

    fn service(ports: &TestPorts) -> TagService {
        TagService::new(ports.tags.clone())
    }

    #[tokio::test]
    async fn test_create_and_duplicate() {
        let ports = test_ports().await;
        let service = service(&ports);
        let tag = service.create("rust").await.unwrap();
        assert_eq!(tag.name, "rust");

        let err = service.create("rust").await.unwrap_err();
        assert!(matches!(err, ApplicationError::DuplicateName(ref m) if m == "标签名称已存在"));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let ports = test_ports().await;
        let err = service(&ports).create("  ").await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_rename() {
        let ports = test_ports().await;
        let service = service(&ports);
        let tag = service.create("rust").await.unwrap();
        let renamed = service
            .update(tag.id, Some("tokio".to_string()))
            .await
            .unwrap();
        assert_eq!(renamed.name, "tokio");
    }

    #[tokio::test]
    async fn test_remove_then_not_found() {
        let ports = test_ports().await;
        let service = service(&ports);
        let tag = service.create("rust").await.unwrap();
        service.remove(tag.id).await.unwrap();
        assert!(matches!(
            service.find_by_id(tag.id).await.unwrap_err(),
            ApplicationError::NotFound { .. }
        ));
        assert_eq!(service.stats().await.unwrap().total, 0);
    }
}
