//! 评论服务
//!
//! 支持游客评论（username/email/url）与登录用户评论（user_id）

use std::sync::Arc;

use chrono::{Datelike, TimeZone, Utc};
use serde::Serialize;

use crate::application::error::ApplicationError;
use crate::application::ports::{CommentListItem, CommentRepositoryPort, NewComment};

/// 创建评论命令
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub username: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub user_id: Option<i64>,
    pub content: String,
    pub post_id: i64,
    pub parent_comment_id: Option<i64>,
}

/// 更新评论命令（字段可选）
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub content: Option<String>,
}

/// 评论统计
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentStats {
    pub total: i64,
    pub this_month: i64,
}

/// 评论服务
pub struct CommentService {
    comments: Arc<dyn CommentRepositoryPort>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepositoryPort>) -> Self {
        Self { comments }
    }

    /// 创建评论
    pub async fn create(&self, command: CreateComment) -> Result<CommentListItem, ApplicationError> {
        let id = self
            .comments
            .insert(&NewComment {
                username: command.username,
                email: command.email,
                url: command.url,
                user_id: command.user_id,
                content: command.content,
                post_id: command.post_id,
                parent_comment_id: command.parent_comment_id,
            })
            .await?;

        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::internal("Comment vanished after insert"))
    }

    /// 获取评论列表（分页，后台管理用）
    pub async fn find_page(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), ApplicationError> {
        Ok(self.comments.find_page(page, page_size).await?)
    }

    /// 获取某文章的评论列表（分页，按时间正序）
    pub async fn find_page_by_post(
        &self,
        post_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<CommentListItem>, i64), ApplicationError> {
        Ok(self
            .comments
            .find_page_by_post(post_id, page, page_size)
            .await?)
    }

    /// 获取评论详情；不存在时返回 None（响应 data 为 null，不是 404）
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CommentListItem>, ApplicationError> {
        Ok(self.comments.find_by_id(id).await?)
    }

    /// 更新评论；不存在时返回 None
    pub async fn update(
        &self,
        id: i64,
        command: UpdateComment,
    ) -> Result<Option<CommentListItem>, ApplicationError> {
        let Some(mut comment) = self.comments.find_record(id).await? else {
            return Ok(None);
        };

        if let Some(content) = command.content {
            comment.content = content;
        }

        self.comments.update(&comment).await?;
        self.find_by_id(id).await
    }

    /// 软删除评论（无存在性检查，幂等）
    pub async fn remove(&self, id: i64) -> Result<(), ApplicationError> {
        self.comments.soft_delete(id).await?;
        Ok(())
    }

    /// 获取评论统计信息（thisMonth 从本月 1 日零点起算）
    pub async fn stats(&self) -> Result<CommentStats, ApplicationError> {
        let total = self.comments.count_active().await?;

        let now = Utc::now();
        let start_of_month = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ApplicationError::internal("Invalid month start"))?;
        let this_month = self.comments.count_active_since(start_of_month).await?;

        Ok(CommentStats { total, this_month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{test_ports, TestPorts};

    fn service(ports: &TestPorts) -> CommentService {
        CommentService::new(ports.comments.clone())
    }

    fn guest_comment(post_id: i64, content: &str) -> CreateComment {
        CreateComment {
            username: Some("路人甲".to_string()),
            email: Some("guest@example.com".to_string()),
            url: None,
            user_id: None,
            content: content.to_string(),
            post_id,
            parent_comment_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_reply() {
        let ports = test_ports().await;
        let service = service(&ports);
        let first = service.create(guest_comment(1, "沙发")).await.unwrap();

        let mut reply = guest_comment(1, "回复沙发");
        reply.parent_comment_id = Some(first.comment.id);
        let second = service.create(reply).await.unwrap();
        assert_eq!(
            second.comment.parent_comment_id,
            Some(first.comment.id)
        );

        // 文章页按时间正序，并带父评论
        let (list, total) = service.find_page_by_post(1, 1, 20).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(list[0].comment.content, "沙发");
        assert_eq!(
            list[1]
                .parent_comment
                .as_ref()
                .map(|p| p.content.as_str()),
            Some("沙发")
        );
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let ports = test_ports().await;
        assert!(service(&ports).find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let ports = test_ports().await;
        let result = service(&ports)
            .update(
                999,
                UpdateComment {
                    content: Some("新内容".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_hides_from_listing() {
        let ports = test_ports().await;
        let service = service(&ports);
        let comment = service.create(guest_comment(1, "沙发")).await.unwrap();
        service.remove(comment.comment.id).await.unwrap();

        let (list, total) = service.find_page(1, 10).await.unwrap();
        assert_eq!(total, 0);
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_stats_counts_current_month() {
        let ports = test_ports().await;
        let service = service(&ports);
        service.create(guest_comment(1, "沙发")).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 1);
        // 刚创建的评论属于本月
        assert_eq!(stats.this_month, 1);
    }
}
