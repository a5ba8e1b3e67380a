//! 分类服务

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CategoryRecord, CategoryRepositoryPort, CategoryType, NewCategory,
};

/// 创建分类命令
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i64>,
    pub category_type: Option<CategoryType>,
}

/// 更新分类命令（字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i64>,
    pub category_type: Option<CategoryType>,
}

/// 分类统计
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub total: i64,
}

/// 分类服务
pub struct CategoryService {
    categories: Arc<dyn CategoryRepositoryPort>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepositoryPort>) -> Self {
        Self { categories }
    }

    /// 创建分类
    pub async fn create(&self, command: CreateCategory) -> Result<CategoryRecord, ApplicationError> {
        if command.name.trim().is_empty() {
            return Err(ApplicationError::bad_request("分类名称不能为空"));
        }

        // 检查分类名是否已存在
        if self.categories.find_by_name(&command.name).await?.is_some() {
            return Err(ApplicationError::DuplicateName("分类名称已存在".to_string()));
        }

        let id = self
            .categories
            .insert(&NewCategory {
                name: command.name,
                description: command.description,
                icon: command.icon,
                sort_order: command.sort_order.unwrap_or(0),
                category_type: command.category_type.unwrap_or_default(),
            })
            .await?;

        self.find_by_id(id).await
    }

    /// 获取分类列表（分页）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CategoryRecord>, i64), ApplicationError> {
        Ok(self.categories.find_page(page, page_size).await?)
    }

    /// 获取所有分类（不分页，用于下拉选择）
    pub async fn find_all_list(&self) -> Result<Vec<CategoryRecord>, ApplicationError> {
        Ok(self.categories.find_all_list().await?)
    }

    /// 获取分类详情
    pub async fn find_by_id(&self, id: i64) -> Result<CategoryRecord, ApplicationError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("分类"))
    }

    /// 更新分类
    pub async fn update(
        &self,
        id: i64,
        command: UpdateCategory,
    ) -> Result<CategoryRecord, ApplicationError> {
        let mut category = self.find_by_id(id).await?;

        // 如果更新了名称，检查是否重复
        if let Some(name) = command.name {
            if name != category.name && self.categories.find_by_name(&name).await?.is_some() {
                return Err(ApplicationError::DuplicateName("分类名称已存在".to_string()));
            }
            category.name = name;
        }
        if let Some(description) = command.description {
            category.description = Some(description);
        }
        if let Some(icon) = command.icon {
            category.icon = Some(icon);
        }
        if let Some(sort_order) = command.sort_order {
            category.sort_order = sort_order;
        }
        if let Some(category_type) = command.category_type {
            category.category_type = category_type;
        }

        self.categories.update(&category).await?;
        self.find_by_id(id).await
    }

    /// 软删除分类
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.find_by_id(id).await?;
        self.categories.soft_delete(id).await?;
        Ok(())
    }

    /// 获取分类统计信息
    pub async fn stats(&self) -> Result<CategoryStats, ApplicationError> {
        Ok(CategoryStats {
            total: self.categories.count_active().await?,
        })
    }
}
