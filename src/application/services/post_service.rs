//! 文章服务
//!
//! 文章与页面（type=1）的增删改查、浏览/点赞计数、统计

use std::sync::Arc;

use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    NewPost, PostDetail, PostListItem, PostRepositoryPort, TagRepositoryPort,
};

/// 创建文章命令
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub author_id: i64,
    pub description: Option<String>,
    pub category_id: i64,
    pub post_type: Option<i64>,
    pub page_type: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
}

/// 更新文章命令（字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover: Option<String>,
    pub author_id: Option<i64>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub post_type: Option<i64>,
    pub page_type: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
}

/// 文章统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub total: i64,
    pub this_month: i64,
}

/// 文章服务
pub struct PostService {
    posts: Arc<dyn PostRepositoryPort>,
    tags: Arc<dyn TagRepositoryPort>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepositoryPort>, tags: Arc<dyn TagRepositoryPort>) -> Self {
        Self { posts, tags }
    }

    /// 创建文章
    pub async fn create(&self, command: CreatePost) -> Result<PostDetail, ApplicationError> {
        if command.title.trim().is_empty() || command.author_id == 0 || command.category_id == 0 {
            return Err(ApplicationError::bad_request("标题、作者和分类不能为空"));
        }

        let id = self
            .posts
            .insert(&NewPost {
                title: command.title,
                content: command.content,
                cover: command.cover,
                author_id: command.author_id,
                description: command.description,
                category_id: command.category_id,
                post_type: command.post_type.unwrap_or(0),
                page_type: command.page_type,
            })
            .await?;

        // 处理标签关联（仅保留存在且未删除的标签）
        if let Some(tag_ids) = command.tag_ids {
            if !tag_ids.is_empty() {
                let tags = self.tags.find_by_ids(&tag_ids).await?;
                let existing: Vec<i64> = tags.iter().map(|t| t.id).collect();
                self.posts.set_tags(id, &existing).await?;
            }
        }

        tracing::info!(post_id = id, "Post created");

        self.find_detail(id).await
    }

    /// 获取文章列表（分页，可按 type 过滤）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
        post_type: Option<i64>,
    ) -> Result<(Vec<PostListItem>, i64), ApplicationError> {
        Ok(self.posts.find_page(page, page_size, post_type).await?)
    }

    /// 获取作者的文章列表（分页）
    pub async fn find_page_by_author(
        &self,
        author_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<PostListItem>, i64), ApplicationError> {
        Ok(self
            .posts
            .find_page_by_author(author_id, page, page_size)
            .await?)
    }

    /// 获取文章详情
    pub async fn find_detail(&self, id: i64) -> Result<PostDetail, ApplicationError> {
        self.posts
            .find_detail(id)
            .await?
            .ok_or(ApplicationError::not_found("文章"))
    }

    /// 更新文章
    pub async fn update(&self, id: i64, command: UpdatePost) -> Result<PostDetail, ApplicationError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("文章"))?;

        if let Some(title) = command.title {
            post.title = title;
        }
        if let Some(content) = command.content {
            post.content = Some(content);
        }
        if let Some(cover) = command.cover {
            post.cover = Some(cover);
        }
        if let Some(author_id) = command.author_id {
            post.author_id = author_id;
        }
        if let Some(description) = command.description {
            post.description = Some(description);
        }
        if let Some(category_id) = command.category_id {
            post.category_id = category_id;
        }
        if let Some(post_type) = command.post_type {
            post.post_type = post_type;
        }
        if let Some(page_type) = command.page_type {
            post.page_type = Some(page_type);
        }

        self.posts.update(&post).await?;

        // 处理标签关联：Some([]) 表示清空，None 表示不动
        if let Some(tag_ids) = command.tag_ids {
            let existing: Vec<i64> = if tag_ids.is_empty() {
                Vec::new()
            } else {
                self.tags
                    .find_by_ids(&tag_ids)
                    .await?
                    .iter()
                    .map(|t| t.id)
                    .collect()
            };
            self.posts.set_tags(id, &existing).await?;
        }

        self.find_detail(id).await
    }

    /// 软删除文章
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("文章"))?;
        self.posts.soft_delete(id).await?;
        Ok(())
    }

    /// 增加浏览量
    pub async fn increment_views(&self, id: i64) -> Result<PostDetail, ApplicationError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("文章"))?;
        self.posts.increment_views(id).await?;
        self.find_detail(id).await
    }

    /// 增加点赞数
    pub async fn increment_likes(&self, id: i64) -> Result<PostDetail, ApplicationError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::not_found("文章"))?;
        self.posts.increment_likes(id).await?;
        self.find_detail(id).await
    }

    /// 获取文章统计信息
    ///
    /// TODO: thisMonth 与 total 同口径（沿用线上行为，月份过滤缺失），
    /// 修正前需与前端确认仪表盘展示
    pub async fn stats(&self) -> Result<PostStats, ApplicationError> {
        let total = self.posts.count_active().await?;
        let this_month = self.posts.count_active().await?;
        Ok(PostStats { total, this_month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NewUser;
    use crate::application::services::test_support::{test_ports, TestPorts};

    async fn seed_author(ports: &TestPorts) -> i64 {
        ports
            .users
            .insert(&NewUser {
                username: "author".to_string(),
                email: "author@example.com".to_string(),
                password: "hash".to_string(),
                nickname: None,
            })
            .await
            .unwrap()
    }

    fn service(ports: &TestPorts) -> PostService {
        PostService::new(ports.posts.clone(), ports.tags.clone())
    }

    fn create_command(author_id: i64, title: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            content: Some("正文".to_string()),
            cover: None,
            author_id,
            description: None,
            category_id: 1,
            post_type: None,
            page_type: None,
            tag_ids: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let err = service(&ports)
            .create(create_command(author_id, "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_create_attaches_only_existing_tags() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let tag_id = ports.tags.insert("rust").await.unwrap();

        let mut command = create_command(author_id, "第一篇");
        command.tag_ids = Some(vec![tag_id, 999]);

        let detail = service(&ports).create(command).await.unwrap();
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.tags[0].name, "rust");
        assert_eq!(detail.author.as_ref().unwrap().username, "author");
    }

    #[tokio::test]
    async fn test_update_clears_tags_with_empty_list() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let tag_id = ports.tags.insert("rust").await.unwrap();

        let mut command = create_command(author_id, "第一篇");
        command.tag_ids = Some(vec![tag_id]);
        let detail = service(&ports).create(command).await.unwrap();

        let updated = service(&ports)
            .update(
                detail.post.id,
                UpdatePost {
                    tag_ids: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_soft_delete_hides_post() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let detail = service(&ports)
            .create(create_command(author_id, "第一篇"))
            .await
            .unwrap();

        service(&ports).remove(detail.post.id).await.unwrap();
        let err = service(&ports)
            .find_detail(detail.post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_increment_views_and_likes() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let detail = service(&ports)
            .create(create_command(author_id, "第一篇"))
            .await
            .unwrap();

        let after_views = service(&ports)
            .increment_views(detail.post.id)
            .await
            .unwrap();
        assert_eq!(after_views.post.views, 1);

        let after_likes = service(&ports)
            .increment_likes(detail.post.id)
            .await
            .unwrap();
        assert_eq!(after_likes.post.likes, 1);
        assert_eq!(after_likes.post.views, 1);
    }

    #[tokio::test]
    async fn test_type_filter_separates_pages_from_posts() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let service = service(&ports);

        service
            .create(create_command(author_id, "普通文章"))
            .await
            .unwrap();
        let mut page = create_command(author_id, "关于");
        page.post_type = Some(1);
        page.page_type = Some("about".to_string());
        service.create(page).await.unwrap();

        let (posts, total) = service.find_page(1, 10, Some(0)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(posts[0].post.title, "普通文章");

        let (pages, total) = service.find_page(1, 10, Some(1)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(pages[0].post.page_type.as_deref(), Some("about"));

        let (_, all_total) = service.find_page(1, 10, None).await.unwrap();
        assert_eq!(all_total, 2);
    }

    #[tokio::test]
    async fn test_stats_this_month_mirrors_total() {
        let ports = test_ports().await;
        let author_id = seed_author(&ports).await;
        let service = service(&ports);
        service
            .create(create_command(author_id, "第一篇"))
            .await
            .unwrap();
        service
            .create(create_command(author_id, "第二篇"))
            .await
            .unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        // 与 total 同口径（见方法注释）
        assert_eq!(stats.this_month, stats.total);
    }
}
