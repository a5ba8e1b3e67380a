//! Link Handlers
//!
//! 友情链接

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::PageQuery;
use crate::application::ports::LinkRecord;
use crate::application::services::{CreateLink, LinkStats, UpdateLink};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 创建友情链接请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(
        required(message = "链接名称不能为空"),
        length(min = 1, max = 191, message = "链接名称最多191个字符")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "链接地址不能为空"),
        length(min = 1, max = 500, message = "链接地址最多500个字符")
    )]
    pub url: Option<String>,

    #[validate(length(max = 500, message = "图标URL最多500个字符"))]
    pub icon: Option<String>,

    #[validate(length(max = 500, message = "链接描述最多500个字符"))]
    pub description: Option<String>,

    #[serde(rename = "order")]
    pub sort_order: Option<i64>,
}

/// 更新友情链接请求（字段可选）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 191, message = "链接名称最多191个字符"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500, message = "链接地址最多500个字符"))]
    pub url: Option<String>,

    #[validate(length(max = 500, message = "图标URL最多500个字符"))]
    pub icon: Option<String>,

    #[validate(length(max = 500, message = "链接描述最多500个字符"))]
    pub description: Option<String>,

    #[serde(rename = "order")]
    pub sort_order: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建友情链接
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkRecord>>), ApiError> {
    let link = state
        .link_service
        .create(CreateLink {
            name: request.name.unwrap_or_default(),
            url: request.url.unwrap_or_default(),
            icon: request.icon,
            description: request.description,
            sort_order: request.sort_order,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(link))))
}

/// 获取友情链接统计信息
pub async fn link_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LinkStats>>, ApiError> {
    let stats = state.link_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取所有友情链接（不分页，前台展示用）
pub async fn list_all_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LinkRecord>>>, ApiError> {
    let list = state.link_service.find_all_list().await?;
    Ok(Json(ApiResponse::success_with_message(list, "获取成功")))
}

/// 获取友情链接列表（分页）
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<LinkRecord>>>, ApiError> {
    let (list, total) = state
        .link_service
        .find_page(query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取友情链接详情
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<LinkRecord>>, ApiError> {
    let link = state.link_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(link, "获取成功")))
}

/// 更新友情链接
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateLinkRequest>,
) -> Result<Json<ApiResponse<LinkRecord>>, ApiError> {
    let link = state
        .link_service
        .update(
            id,
            UpdateLink {
                name: request.name,
                url: request.url,
                icon: request.icon,
                description: request.description,
                sort_order: request.sort_order,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(link)))
}

/// 软删除友情链接
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.link_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
