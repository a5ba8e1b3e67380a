//! 友情链接服务

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{LinkRecord, LinkRepositoryPort, NewLink};

/// 创建友情链接命令
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub name: String,
    pub url: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
}

/// 更新友情链接命令（字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdateLink {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
}

/// 友情链接统计
#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub total: i64,
}

/// 友情链接服务
pub struct LinkService {
    links: Arc<dyn LinkRepositoryPort>,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepositoryPort>) -> Self {
        Self { links }
    }

    /// 创建友情链接
    pub async fn create(&self, command: CreateLink) -> Result<LinkRecord, ApplicationError> {
        if command.name.trim().is_empty() || command.url.trim().is_empty() {
            return Err(ApplicationError::bad_request("链接名称和地址不能为空"));
        }

        let id = self
            .links
            .insert(&NewLink {
                name: command.name,
                url: command.url,
                icon: command.icon,
                description: command.description,
                sort_order: command.sort_order.unwrap_or(0),
            })
            .await?;

        self.find_by_id(id).await
    }

    /// 获取友情链接列表（分页）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<LinkRecord>, i64), ApplicationError> {
        Ok(self.links.find_page(page, page_size).await?)
    }

    /// 获取所有友情链接（不分页，前台展示用）
    pub async fn find_all_list(&self) -> Result<Vec<LinkRecord>, ApplicationError> {
        Ok(self.links.find_all_list().await?)
    }

    /// 获取友情链接详情
    pub async fn find_by_id(&self, id: i64) -> Result<LinkRecord, ApplicationError> {
        self.links
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("友情链接"))
    }

    /// 更新友情链接
    pub async fn update(&self, id: i64, command: UpdateLink) -> Result<LinkRecord, ApplicationError> {
        let mut link = self.find_by_id(id).await?;

        if let Some(name) = command.name {
            link.name = name;
        }
        if let Some(url) = command.url {
            link.url = url;
        }
        if let Some(icon) = command.icon {
            link.icon = Some(icon);
        }
        if let Some(description) = command.description {
            link.description = Some(description);
        }
        if let Some(sort_order) = command.sort_order {
            link.sort_order = sort_order;
        }

        self.links.update(&link).await?;
        self.find_by_id(id).await
    }

    /// 软删除友情链接
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.find_by_id(id).await?;
        self.links.soft_delete(id).await?;
        Ok(())
    }

    /// 获取友情链接统计信息
    pub async fn stats(&self) -> Result<LinkStats, ApplicationError> {
        Ok(LinkStats {
            total: self.links.count_active().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{test_ports, TestPorts};

    fn service(ports: &TestPorts) -> LinkService {
        LinkService::new(ports.links.clone())
    }

    fn create_command(name: &str, order: i64) -> CreateLink {
        CreateLink {
            name: name.to_string(),
            url: format!("https://{}.example.com", name),
            icon: None,
            description: None,
            sort_order: Some(order),
        }
    }

    #[tokio::test]
    async fn test_create_requires_name_and_url() {
        let ports = test_ports().await;
        let mut command = create_command("blog", 0);
        command.url = String::new();
        let err = service(&ports).create(command).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "链接名称和地址不能为空"));
    }

    #[tokio::test]
    async fn test_list_ordered_by_sort_order() {
        let ports = test_ports().await;
        let service = service(&ports);
        service.create(create_command("second", 2)).await.unwrap();
        service.create(create_command("first", 1)).await.unwrap();

        let list = service.find_all_list().await.unwrap();
        assert_eq!(list[0].name, "first");
        assert_eq!(list[1].name, "second");
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let ports = test_ports().await;
        let service = service(&ports);
        let link = service.create(create_command("blog", 0)).await.unwrap();

        let updated = service
            .update(
                link.id,
                UpdateLink {
                    description: Some("好友的博客".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("好友的博客"));

        service.remove(link.id).await.unwrap();
        assert_eq!(service.stats().await.unwrap().total, 0);
    }
}
