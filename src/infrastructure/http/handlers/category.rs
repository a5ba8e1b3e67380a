//! Category Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::PageQuery;
use crate::application::ports::{CategoryRecord, CategoryType};
use crate::application::services::{CategoryStats, CreateCategory, UpdateCategory};
use crate::infrastructure::http::dto::{ApiResponse, PaginationData};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 创建分类请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(
        required(message = "分类名称不能为空"),
        length(min = 1, max = 100, message = "分类名称最多100个字符")
    )]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "分类描述最多500个字符"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "图标URL最多255个字符"))]
    pub icon: Option<String>,

    #[serde(rename = "order")]
    pub sort_order: Option<i64>,

    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

/// 更新分类请求（字段可选）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "分类名称最多100个字符"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "分类描述最多500个字符"))]
    pub description: Option<String>,

    #[validate(length(max = 255, message = "图标URL最多255个字符"))]
    pub icon: Option<String>,

    #[serde(rename = "order")]
    pub sort_order: Option<i64>,

    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建分类
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryRecord>>), ApiError> {
    let category = state
        .category_service
        .create(CreateCategory {
            name: request.name.unwrap_or_default(),
            description: request.description,
            icon: request.icon,
            sort_order: request.sort_order,
            category_type: request.category_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::created(category))))
}

/// 获取分类统计信息
pub async fn category_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CategoryStats>>, ApiError> {
    let stats = state.category_service.stats().await?;
    Ok(Json(ApiResponse::success_with_message(stats, "获取成功")))
}

/// 获取所有分类（不分页，用于下拉选择）
pub async fn list_all_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryRecord>>>, ApiError> {
    let list = state.category_service.find_all_list().await?;
    Ok(Json(ApiResponse::success_with_message(list, "获取成功")))
}

/// 获取分类列表（分页）
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<ApiResponse<PaginationData<CategoryRecord>>>, ApiError> {
    let (list, total) = state
        .category_service
        .find_page(query.page, query.page_size)
        .await?;

    Ok(Json(ApiResponse::paginated(
        list,
        total,
        query.page,
        query.page_size,
    )))
}

/// 获取分类详情
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<CategoryRecord>>, ApiError> {
    let category = state.category_service.find_by_id(id).await?;
    Ok(Json(ApiResponse::success_with_message(category, "获取成功")))
}

/// 更新分类
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryRecord>>, ApiError> {
    let category = state
        .category_service
        .update(
            id,
            UpdateCategory {
                name: request.name,
                description: request.description,
                icon: request.icon,
                sort_order: request.sort_order,
                category_type: request.category_type,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(category)))
}

/// 软删除分类
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.category_service.remove(id).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
