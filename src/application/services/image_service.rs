//! 图片服务
//!
//! 只管理图片元数据记录；文件落盘由 HTTP 层上传处理完成

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ImageCategoryFilter, ImageRecord, ImageRepositoryPort, NewImage,
};

/// 更新图片命令（字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdateImage {
    pub name: Option<String>,
    pub category_id: Option<Option<i64>>,
}

/// 图片统计
#[derive(Debug, Clone, Serialize)]
pub struct ImageStats {
    pub total: i64,
}

/// 图片服务
pub struct ImageService {
    images: Arc<dyn ImageRepositoryPort>,
}

impl ImageService {
    pub fn new(images: Arc<dyn ImageRepositoryPort>) -> Self {
        Self { images }
    }

    /// 创建图片记录
    pub async fn create(&self, image: NewImage) -> Result<ImageRecord, ApplicationError> {
        if image.name.trim().is_empty() || image.url.trim().is_empty() {
            return Err(ApplicationError::bad_request("图片名称和URL不能为空"));
        }

        let id = self.images.insert(&image).await?;
        self.find_by_id(id).await
    }

    /// 获取图片列表（分页，可按分类过滤）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        filter: ImageCategoryFilter,
    ) -> Result<(Vec<ImageRecord>, i64), ApplicationError> {
        Ok(self.images.find_page(page, page_size, filter).await?)
    }

    /// 获取图片详情
    pub async fn find_by_id(&self, id: i64) -> Result<ImageRecord, ApplicationError> {
        self.images
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("图片"))
    }

    /// 更新图片信息
    pub async fn update(&self, id: i64, command: UpdateImage) -> Result<ImageRecord, ApplicationError> {
        let mut image = self.find_by_id(id).await?;

        if let Some(name) = command.name {
            image.name = name;
        }
        if let Some(category_id) = command.category_id {
            image.category_id = category_id;
        }

        self.images.update(&image).await?;
        self.find_by_id(id).await
    }

    /// 软删除图片
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.find_by_id(id).await?;
        self.images.soft_delete(id).await?;
        Ok(())
    }

    /// 批量软删除图片
    pub async fn batch_remove(&self, ids: &[i64]) -> Result<(), ApplicationError> {
        if ids.is_empty() {
            return Err(ApplicationError::bad_request("请选择要删除的图片"));
        }
        self.images.soft_delete_many(ids).await?;
        Ok(())
    }

    /// 获取图片统计信息
    pub async fn stats(&self) -> Result<ImageStats, ApplicationError> {
        Ok(ImageStats {
            total: self.images.count_active().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{test_ports, TestPorts};

    fn service(ports: &TestPorts) -> ImageService {
        ImageService::new(ports.images.clone())
    }

    fn new_image(name: &str, category_id: Option<i64>) -> NewImage {
        NewImage {
            name: name.to_string(),
            url: format!("/uploads/images/{}.png", name),
            size: 1024,
            mime_type: Some("image/png".to_string()),
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_requires_name_and_url() {
        let ports = test_ports().await;
        let mut image = new_image("pic", None);
        image.url = String::new();
        let err = service(&ports).create(image).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_category_filters() {
        let ports = test_ports().await;
        let service = service(&ports);
        service.create(new_image("a", Some(1))).await.unwrap();
        service.create(new_image("b", None)).await.unwrap();

        let (_, all) = service
            .find_page(1, 20, ImageCategoryFilter::All)
            .await
            .unwrap();
        assert_eq!(all, 2);

        let (list, total) = service
            .find_page(1, 20, ImageCategoryFilter::Uncategorized)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].name, "b");

        let (list, total) = service
            .find_page(1, 20, ImageCategoryFilter::Category(1))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(list[0].name, "a");
    }

    #[tokio::test]
    async fn test_batch_remove_requires_ids() {
        let ports = test_ports().await;
        let err = service(&ports).batch_remove(&[]).await.unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "请选择要删除的图片"));
    }

    #[tokio::test]
    async fn test_batch_remove_soft_deletes_all() {
        let ports = test_ports().await;
        let service = service(&ports);
        let a = service.create(new_image("a", None)).await.unwrap();
        let b = service.create(new_image("b", None)).await.unwrap();

        service.batch_remove(&[a.id, b.id]).await.unwrap();
        assert_eq!(service.stats().await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_update_reassigns_category() {
        let ports = test_ports().await;
        let service = service(&ports);
        let image = service.create(new_image("a", Some(1))).await.unwrap();

        let updated = service
            .update(
                image.id,
                UpdateImage {
                    category_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category_id, None);
    }
}
