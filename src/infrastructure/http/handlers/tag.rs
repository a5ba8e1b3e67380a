//! Tag Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::PageQuery;
use crate::application::ports::TagRecord;
use crate::application::services::TagStats;
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 创建标签请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(
        required(message = "标签名称不能为空"),
        length(min = 1, max = 191, message = "标签名称最多191个字符")
    )]
    pub name: Option<String>,
}

/// 更新标签请求
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 191, message = "标签名称最多191个字符"))]
    pub name: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建标签
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TagRecord>>), ApiError> {
    let tag = state
        .tag_service
        .create(&request.name.unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(tag))))
}

/// 获取标签统计信息
pub async fn tag_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<TagStats>>, ApiError> {
    let stats = state.tag_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取所有标签（不分页，用于下拉选择）
pub async fn list_all_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TagRecord>>>, ApiError> {
    let list = state.tag_service.find_all_list().await?;
    Ok(Json(ApiResponse::success_with_message(list, "获取成功")))
}

/// 获取标签列表（分页）
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<TagRecord>>>, ApiError> {
    let (list, total) = state
        .tag_service
        .find_page(query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取标签详情
pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<TagRecord>>, ApiError> {
    let tag = state.tag_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(tag, "获取成功")))
}

/// 更新标签
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateTagRequest>,
) -> Result<Json<ApiResponse<TagRecord>>, ApiError> {
    let tag = state.tag_service.update(id, request.name).await?;
    Ok(Json(ApiResponse::success(tag)))
}

/// 软删除标签
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.tag_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
