//! Post Handlers
//!
//! 文章与页面（type=1）共用同一组接口

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use crate::application::ports::{PostDetail, PostListItem};
use crate::application::services::{CreatePost, PostStats, UpdatePost};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 创建文章请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(
        required(message = "标题不能为空"),
        length(min = 1, message = "标题不能为空")
    )]
    pub title: Option<String>,

    pub content: Option<String>,

    pub cover: Option<String>,

    #[validate(required(message = "作者 ID 不能为空"))]
    pub author_id: Option<i64>,

    pub description: Option<String>,

    #[validate(required(message = "分类 ID 不能为空"))]
    pub category_id: Option<i64>,

    #[serde(rename = "type")]
    pub post_type: Option<i64>,

    pub page_type: Option<String>,

    pub tag_ids: Option<Vec<i64>>,
}

/// 更新文章请求（字段可选）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "标题不能为空"))]
    pub title: Option<String>,

    pub content: Option<String>,

    pub cover: Option<String>,

    pub author_id: Option<i64>,

    pub description: Option<String>,

    pub category_id: Option<i64>,

    #[serde(rename = "type")]
    pub post_type: Option<i64>,

    pub page_type: Option<String>,

    pub tag_ids: Option<Vec<i64>>,
}

/// 文章列表查询参数（type 用于区分文章/页面）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPostsQuery {
    pub page: i64,
    pub page_size: i64,
    #[serde(rename = "type")]
    pub post_type: Option<i64>,
}

impl Default for ListPostsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            post_type: None,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建文章
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostDetail>>), ApiError> {
    let detail = state
        .post_service
        .create(CreatePost {
            title: request.title.unwrap_or_default(),
            content: request.content,
            cover: request.cover,
            author_id: request.author_id.unwrap_or_default(),
            description: request.description,
            category_id: request.category_id.unwrap_or_default(),
            post_type: request.post_type,
            page_type: request.page_type,
            tag_ids: request.tag_ids,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(detail))))
}

/// 获取文章统计信息
pub async fn post_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PostStats>>, ApiError> {
    let stats = state.post_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取作者的文章列表（分页）
pub async fn list_posts_by_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<super::PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<PostListItem>>>, ApiError> {
    let (list, total) = state
        .post_service
        .find_page_by_author(author_id, query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取文章列表（分页，可按 type 过滤）
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> Result<Json<ApiResponse<PaginationData<PostListItem>>>, ApiError> {
    let (list, total) = state
        .post_service
        .find_page(query.page, query.page_size, query.post_type)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取文章详情
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<PostDetail>>, ApiError> {
    let detail = state.post_service.find_detail(id).await?;
    Ok(Json(ApiResponse::success_with_message(detail, "获取成功")))
}

/// 更新文章
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<ApiResponse<PostDetail>>, ApiError> {
    let detail = state
        .post_service
        .update(
            id,
            UpdatePost {
                title: request.title,
                content: request.content,
                cover: request.cover,
                author_id: request.author_id,
                description: request.description,
                category_id: request.category_id,
                post_type: request.post_type,
                page_type: request.page_type,
                tag_ids: request.tag_ids,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(detail)))
}

/// 软删除文章
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.post_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}

/// 增加文章浏览量
pub async fn increment_post_views(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<PostDetail>>, ApiError> {
    let detail = state.post_service.increment_views(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// 增加文章点赞数
pub async fn increment_post_likes(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<PostDetail>>, ApiError> {
    let detail = state.post_service.increment_likes(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}
