//! Comment Handlers
//!
//! 游客可直接发表评论（公开路由），管理操作走受保护路由

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::PageQuery;
use crate::application::ports::CommentListItem;
use crate::application::services::{CommentStats, CreateComment, UpdateComment};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 发表评论请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(max = 191, message = "昵称最多191个字符"))]
    pub username: Option<String>,

    #[validate(email(message = "邮箱格式不正确"), length(max = 191, message = "邮箱最多191个字符"))]
    pub email: Option<String>,

    #[validate(length(max = 191, message = "网址最多191个字符"))]
    pub url: Option<String>,

    pub user_id: Option<i64>,

    #[validate(
        required(message = "评论内容不能为空"),
        length(min = 1, max = 500, message = "评论内容最多500个字符")
    )]
    pub content: Option<String>,

    #[validate(required(message = "文章 ID 不能为空"))]
    pub post_id: Option<i64>,

    pub parent_comment_id: Option<i64>,
}

/// 更新评论请求
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 500, message = "评论内容最多500个字符"))]
    pub content: Option<String>,
}

/// 文章评论查询参数（默认每页 20 条）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostCommentsQuery {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PostCommentsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 发表评论
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentListItem>>), ApiError> {
    let comment = state
        .comment_service
        .create(CreateComment {
            username: request.username,
            email: request.email,
            url: request.url,
            user_id: request.user_id,
            content: request.content.unwrap_or_default(),
            post_id: request.post_id.unwrap_or_default(),
            parent_comment_id: request.parent_comment_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(comment))))
}

/// 获取评论列表（分页，后台管理）
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<CommentListItem>>>, ApiError> {
    let (list, total) = state
        .comment_service
        .find_page(query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取某文章的评论列表（分页，按时间正序）
pub async fn list_comments_by_post(
    State(state): State<Arc<AppState>>,
    ApiPath(post_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PostCommentsQuery>,
) -> Result<Json<ApiResponse<PaginationData<CommentListItem>>>, ApiError> {
    let (list, total) = state
        .comment_service
        .find_page_by_post(post_id, query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取评论统计信息
pub async fn comment_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CommentStats>>, ApiError> {
    let stats = state.comment_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取评论详情（不存在时 data 为 null）
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Option<CommentListItem>>>, ApiError> {
    let comment = state.comment_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(comment, "获取成功")))
}

/// 更新评论（不存在时 data 为 null）
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<ApiResponse<Option<CommentListItem>>>, ApiError> {
    let comment = state
        .comment_service
        .update(
            id,
            UpdateComment {
                content: request.content,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(comment)))
}

/// 软删除评论
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.comment_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
