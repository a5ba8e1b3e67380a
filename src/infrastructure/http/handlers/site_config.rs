//! Site Config Handlers
//!
//! 站点配置键值对：读公开，写受保护

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

use crate::application::ports::ConfigRecord;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 指定键集合查询参数（逗号分隔）
#[derive(Debug, Deserialize)]
pub struct ConfigKeysQuery {
    #[serde(default)]
    pub keys: String,
}

/// 单个配置项
#[derive(Debug, Deserialize, Validate)]
pub struct ConfigEntry {
    #[validate(
        required(message = "配置键不能为空"),
        length(min = 1, max = 100, message = "配置键最多100个字符")
    )]
    pub key: Option<String>,

    pub value: Option<String>,
}

/// 批量设置配置请求
#[derive(Debug, Deserialize, Validate)]
pub struct SetConfigsRequest {
    #[validate(nested)]
    #[serde(default)]
    pub configs: Vec<ConfigEntry>,
}

/// 设置单个配置请求
#[derive(Debug, Deserialize, Validate)]
pub struct SetConfigRequest {
    pub value: Option<String>,
}

/// 单个配置响应
#[derive(Debug, Serialize)]
pub struct ConfigValueResponse {
    pub key: String,
    pub value: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取所有配置
pub async fn get_all_configs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    let configs = state.site_config_service.get_all().await?;
    Ok(Json(ApiResponse::success_with_message(configs, "获取成功")))
}

/// 获取指定配置（keys 逗号分隔）
pub async fn get_configs_by_keys(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ConfigKeysQuery>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    let keys: Vec<String> = query
        .keys
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    let configs = state.site_config_service.get_many(&keys).await?;
    Ok(Json(ApiResponse::success_with_message(configs, "获取成功")))
}

/// 获取单个配置（不存在时 value 为 null）
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<ApiResponse<ConfigValueResponse>>, ApiError> {
    let value = state.site_config_service.get(&key).await?;
    Ok(Json(ApiResponse::success_with_message(
        ConfigValueResponse { key, value },
        "获取成功",
    )))
}

/// 批量设置配置，返回设置后的全量映射
pub async fn set_configs(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SetConfigsRequest>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, ApiError> {
    let entries: Vec<(String, String)> = request
        .configs
        .into_iter()
        .map(|entry| {
            (
                entry.key.unwrap_or_default(),
                entry.value.unwrap_or_default(),
            )
        })
        .collect();

    let configs = state.site_config_service.set_many(&entries).await?;
    Ok(Json(ApiResponse::success_with_message(configs, "设置成功")))
}

/// 设置单个配置
pub async fn set_config(
    State(state): State<Arc<AppState>>,
    ApiPath(key): ApiPath<String>,
    ValidatedJson(request): ValidatedJson<SetConfigRequest>,
) -> Result<Json<ApiResponse<ConfigRecord>>, ApiError> {
    let record = state
        .site_config_service
        .set(&key, request.value.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(ApiResponse::success_with_message(record, "设置成功")))
}

/// 删除配置
pub async fn delete_config(
    State(state): State<Arc<AppState>>,
    ApiPath(key): ApiPath<String>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.site_config_service.delete(&key).await?;
    Ok(Json(ApiResponse::success(Value::Null)))
}
